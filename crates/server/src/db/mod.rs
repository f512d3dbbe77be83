//! Database operations for the point-of-sale `SQLite` store.
//!
//! ## Tables
//!
//! - `customer` - Walk-in and member customers
//! - `member_credential` - Password hashes for members (1:1 with `customer`)
//! - `category` - Menu categories
//! - `product` - Menu items with their current price
//! - `customer_order` - Orders with their derived total
//! - `order_item` - Order lines with the unit price captured at order time
//! - `tower_sessions` - Session storage, owned by `tower-sessions-sqlx-store`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/`, embedded at compile
//! time, and applied on server start-up or via:
//! ```bash
//! cargo run -p brewdesk-cli -- migrate
//! ```

pub mod catalog;
pub mod customers;
pub mod orders;
pub mod reports;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use reports::ReportRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Constraint violation (e.g., duplicate category name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Input the store refuses to persist (e.g., an order total out of range).
    #[error("{0}")]
    Invalid(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing. Foreign keys are enforced and
/// file databases use the WAL journal so readers do not block the writer.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply all embedded migrations.
///
/// # Errors
///
/// Returns `RepositoryError::Migration` if a migration fails or a previously
/// applied migration was modified.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Open a private in-memory database with migrations applied.
///
/// The pool holds exactly one connection that is never recycled, since every
/// `SQLite` in-memory connection is its own database. Used by tests and
/// throwaway runs.
///
/// # Errors
///
/// Returns `RepositoryError` if the connection or the migrations fail.
pub async fn connect_in_memory() -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}
