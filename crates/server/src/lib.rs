//! Brewdesk point-of-sale server library.
//!
//! Exposes the router, data layer and services so the binary, the CLI and
//! the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary so tests run without a hub.
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    routes::routes()
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Create the session store and build the router in one step.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn build_app(state: AppState) -> Result<Router, sqlx::Error> {
    let store = middleware::create_session_store(state.pool()).await?;
    let session_layer = middleware::create_session_layer(store, state.config());
    Ok(app(state, session_layer))
}
