//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! brewdesk-cli migrate
//! ```
//!
//! Migrations live in `crates/server/migrations/` and are embedded in the
//! server library, so the CLI and the server always agree on the schema.

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running migrations...");
    super::connect().await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
