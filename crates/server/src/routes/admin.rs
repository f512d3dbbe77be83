//! Admin session route handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::{JsonOrForm, MessageResponse};
use crate::error::{AppError, Result};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Admin login form, posted as JSON or `application/x-www-form-urlencoded`.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Log the admin in and start a session.
#[tracing::instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonOrForm(request): JsonOrForm<AdminLoginRequest>,
) -> Result<Json<MessageResponse>> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(AppError::BadRequest(
            "Username and password are required".to_owned(),
        ));
    };

    if !state.config().admin.matches(username.trim(), &password) {
        tracing::warn!(username = %username, "Admin login failed");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_owned(),
        ));
    }

    let admin = CurrentAdmin {
        username: username.trim().to_owned(),
        logged_in_at: Utc::now(),
    };
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(username = %admin.username, "Admin logged in");
    Ok(Json(MessageResponse::new("Logged in")))
}

/// End the admin session.
#[tracing::instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(Json(MessageResponse::new("Logged out")))
}
