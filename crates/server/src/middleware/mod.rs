//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (permissive)
//! 5. Session layer (tower-sessions with `SQLite` store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, create_session_store};
