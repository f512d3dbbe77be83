//! CLI command implementations.

pub mod migrate;
pub mod report;
pub mod seed;

use sqlx::SqlitePool;

use brewdesk_server::config::ServerConfig;
use brewdesk_server::db;

/// Load configuration and open the database with migrations applied.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database cannot be
/// opened, or a migration fails.
pub async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to database");

    db::run_migrations(&pool).await?;
    Ok(pool)
}
