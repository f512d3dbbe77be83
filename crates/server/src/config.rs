//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults reproduce a local single-till setup.
//!
//! - `BREWDESK_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://brewdesk.db`)
//! - `BREWDESK_HOST` - Bind address (default: 127.0.0.1)
//! - `BREWDESK_PORT` - Listen port (default: 5050)
//! - `BREWDESK_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: `http://localhost:5050`)
//! - `BREWDESK_ADMIN_USERNAME` - Admin login name (default: admin)
//! - `BREWDESK_ADMIN_PASSWORD` - Admin login password (default: admin123)
//! - `BREWDESK_SEED_ON_START` - Seed reference data at start-up (default: true)
//! - `BREWDESK_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://brewdesk.db";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Fixed admin credentials for the back-office session.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Admin login name.
    pub username: String,
    /// Admin login password.
    pub password: SecretString,
}

impl AdminCredentials {
    /// Check a submitted username/password pair.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        // Evaluate both comparisons so timing does not reveal which one failed.
        let user_ok = self.username == username;
        let pass_ok = self.password.expose_secret() == password;
        user_ok & pass_ok
    }

    /// Whether the built-in development password is still in use.
    #[must_use]
    pub fn uses_default_password(&self) -> bool {
        self.password.expose_secret() == DEFAULT_ADMIN_PASSWORD
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the server
    pub base_url: String,
    /// Back-office login
    pub admin: AdminCredentials,
    /// Insert categories, products and sample customers when the store is empty
    pub seed_on_start: bool,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let database_url = lookup("BREWDESK_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let host = get_or("BREWDESK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BREWDESK_HOST".to_owned(), e.to_string()))?;
        let port = get_or("BREWDESK_PORT", "5050")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BREWDESK_PORT".to_owned(), e.to_string()))?;
        let base_url = get_or("BREWDESK_BASE_URL", "http://localhost:5050");

        let admin_username = get_or("BREWDESK_ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME);
        let admin_password = get_or("BREWDESK_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD);
        if admin_username.trim().is_empty() || admin_password.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "BREWDESK_ADMIN_USERNAME/BREWDESK_ADMIN_PASSWORD".to_owned(),
                "admin credentials cannot be empty".to_owned(),
            ));
        }

        let seed_on_start = parse_bool(
            "BREWDESK_SEED_ON_START",
            &get_or("BREWDESK_SEED_ON_START", "true"),
        )?;
        let log_format = match get_or("BREWDESK_LOG_FORMAT", "pretty").as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "BREWDESK_LOG_FORMAT".to_owned(),
                    format!("expected 'pretty' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            admin: AdminCredentials {
                username: admin_username,
                password: SecretString::from(admin_password),
            },
            seed_on_start,
            log_format,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Parse a boolean flag value.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url.expose_secret(), DEFAULT_DATABASE_URL);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5050");
        assert_eq!(config.admin.username, "admin");
        assert!(config.admin.uses_default_password());
        assert!(config.seed_on_start);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = config_from(&[("DATABASE_URL", "sqlite://other.db")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://other.db");

        let config = config_from(&[
            ("DATABASE_URL", "sqlite://other.db"),
            ("BREWDESK_DATABASE_URL", "sqlite://primary.db"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://primary.db");
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("BREWDESK_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "BREWDESK_PORT"));
    }

    #[test]
    fn test_seed_flag_parsing() {
        assert!(!config_from(&[("BREWDESK_SEED_ON_START", "false")]).unwrap().seed_on_start);
        assert!(config_from(&[("BREWDESK_SEED_ON_START", "maybe")]).is_err());
    }

    #[test]
    fn test_json_log_format() {
        let config = config_from(&[("BREWDESK_LOG_FORMAT", "json")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config_from(&[("BREWDESK_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_secure_cookies_follow_base_url() {
        let config = config_from(&[("BREWDESK_BASE_URL", "https://till.example.com")]).unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_admin_credentials_match() {
        let config = config_from(&[("BREWDESK_ADMIN_PASSWORD", "s3cret-till")]).unwrap();
        assert!(config.admin.matches("admin", "s3cret-till"));
        assert!(!config.admin.matches("admin", "admin123"));
        assert!(!config.admin.matches("root", "s3cret-till"));
        assert!(!config.admin.uses_default_password());
    }

    #[test]
    fn test_empty_admin_password_rejected() {
        assert!(config_from(&[("BREWDESK_ADMIN_PASSWORD", "")]).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = config_from(&[("BREWDESK_ADMIN_PASSWORD", "super-secret-pass")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-pass"));
    }
}
