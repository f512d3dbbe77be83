//! Session-related types.
//!
//! Types stored in the session for back-office authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin login name.
    pub username: String,
    /// When this session was authenticated.
    pub logged_in_at: DateTime<Utc>,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
