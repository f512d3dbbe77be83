//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during member authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// Invalid credentials (unknown email, malformed email or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
