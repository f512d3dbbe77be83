//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database)
//!
//! # Catalog
//! GET  /api/products              - Active products
//! GET  /api/categories            - Categories
//!
//! # Customers and members
//! POST /api/customers             - Create customer
//! POST /api/auth/register         - Register member
//! POST /api/auth/login            - Member login
//!
//! # Orders
//! POST /api/orders                - Place order
//! GET  /api/orders                - Order history (admin)
//! GET  /api/orders/{id}/details   - Order items (admin)
//!
//! # Reports
//! GET  /api/reports/sales         - Daily sales
//! GET  /api/reports/products      - Product sales
//! GET  /api/reports/customers     - Customer spend
//!
//! # Admin session
//! POST /admin/login               - Admin login
//! POST /admin/logout              - Admin logout (GET also accepted)
//! ```

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod customers;
pub mod health;
pub mod orders;
pub mod reports;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the JSON API router (mounted at `/api`).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::products))
        .route("/categories", get(catalog::categories))
        .route("/customers", post(customers::create))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/orders", get(orders::history).post(orders::create))
        .route("/orders/{id}/details", get(orders::details))
        .route("/reports/sales", get(reports::sales))
        .route("/reports/products", get(reports::products))
        .route("/reports/customers", get(reports::customers))
}

/// Create the admin session router (mounted at `/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/logout", get(admin::logout).post(admin::logout))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .nest("/admin", admin_routes())
}
