//! Integration test harness for Brewdesk.
//!
//! Builds the real router on top of a private in-memory `SQLite` database and
//! drives it with `tower::ServiceExt::oneshot`, so no server process or
//! database file is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p brewdesk-integration-tests
//!
//! # Smoke test against a running server (default http://localhost:5050)
//! cargo test -p brewdesk-integration-tests -- --ignored
//! ```

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use brewdesk_server::config::ServerConfig;
use brewdesk_server::db;
use brewdesk_server::services::seed;
use brewdesk_server::state::AppState;

/// Admin credentials used by the test configuration (the defaults).
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Result type for harness helpers.
pub type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

/// A router wired to its own in-memory database.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// `name=value` of the session cookie, if one was set.
    pub cookie: Option<String>,
}

impl TestApp {
    /// Empty store with migrations applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database or the session store cannot be set up.
    pub async fn empty() -> TestResult<Self> {
        let pool = db::connect_in_memory().await?;
        let config = ServerConfig::from_lookup(|_| None)?;
        let router = brewdesk_server::build_app(AppState::new(config, pool.clone())).await?;
        Ok(Self { router, pool })
    }

    /// Store with the reference menu and sample customers.
    ///
    /// # Errors
    ///
    /// Returns an error if setup or seeding fails.
    pub async fn seeded() -> TestResult<Self> {
        let app = Self::empty().await?;
        seed::seed_reference_data(&app.pool).await?;
        Ok(app)
    }

    /// Send a request and buffer the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body is not JSON.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        cookie: Option<&str>,
    ) -> TestResult<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(json)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    /// Send a prepared request and buffer the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read or is not JSON.
    pub async fn send(&self, request: Request<Body>) -> TestResult<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;

        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_owned);

        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        Ok(TestResponse {
            status,
            body,
            cookie,
        })
    }

    /// `GET` without a session.
    ///
    /// # Errors
    ///
    /// See [`TestApp::request`].
    pub async fn get(&self, uri: &str) -> TestResult<TestResponse> {
        self.request(Method::GET, uri, None, None).await
    }

    /// `POST` a JSON body without a session.
    ///
    /// # Errors
    ///
    /// See [`TestApp::request`].
    pub async fn post(&self, uri: &str, body: &Value) -> TestResult<TestResponse> {
        self.request(Method::POST, uri, Some(body), None).await
    }

    /// Log in as admin and return the session cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the login is rejected or sets no cookie.
    pub async fn admin_cookie(&self) -> TestResult<String> {
        let body = serde_json::json!({
            "username": ADMIN_USERNAME,
            "password": ADMIN_PASSWORD,
        });
        let response = self.post("/admin/login", &body).await?;
        if response.status != StatusCode::OK {
            return Err(format!("admin login failed: {}", response.status).into());
        }
        response
            .cookie
            .ok_or_else(|| "admin login set no session cookie".into())
    }
}
