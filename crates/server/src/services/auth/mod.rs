//! Member authentication service.
//!
//! Members register with an email and password and log in with the same
//! pair. Passwords are stored as Argon2id PHC strings with a per-member salt.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;

use brewdesk_core::Email;

use crate::db::customers::CustomerRepository;
use crate::models::customer::{MemberProfile, MemberSummary, NewMember};

/// Member registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
}

/// Member login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Member authentication service.
pub struct MemberAuthService<'a> {
    customers: CustomerRepository<'a>,
}

impl<'a> MemberAuthService<'a> {
    /// Create a new member authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
        }
    }

    /// Register a new member.
    ///
    /// Creates a `member` customer and its credential in one transaction.
    /// Emails are not unique; a later registration shadows earlier ones at
    /// login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if name, email or password is missing,
    /// the email is malformed, or the date of birth is not `YYYY-MM-DD`.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` if the insert fails.
    pub async fn register(&self, registration: Registration) -> Result<MemberSummary, AuthError> {
        let (Some(name), Some(email), Some(password)) = (
            non_blank(registration.name),
            non_blank(registration.email),
            registration.password.filter(|p| !p.trim().is_empty()),
        ) else {
            return Err(AuthError::Validation(
                "Name, email, and password are required".to_owned(),
            ));
        };

        let email =
            Email::parse(&email).map_err(|e| AuthError::Validation(format!("Invalid email: {e}")))?;

        let date_of_birth = non_blank(registration.date_of_birth)
            .map(|dob| {
                NaiveDate::parse_from_str(&dob, "%Y-%m-%d").map_err(|_| {
                    AuthError::Validation("date_of_birth must be YYYY-MM-DD".to_owned())
                })
            })
            .transpose()?;

        let password_hash = hash_password(&password)?;

        let member = NewMember {
            name,
            email,
            phone: non_blank(registration.phone),
            address: non_blank(registration.address),
            date_of_birth,
        };
        let summary = self.customers.create_member(&member, &password_hash).await?;

        tracing::info!(customer_id = %summary.customer_id, "Member registered");
        Ok(summary)
    }

    /// Log a member in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if email or password is missing.
    /// Returns `AuthError::InvalidCredentials` if the email is malformed or
    /// unknown, or the password is wrong.
    pub async fn login(&self, login: Login) -> Result<MemberProfile, AuthError> {
        let (Some(email), Some(password)) = (
            non_blank(login.email),
            login.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::Validation(
                "Email and password are required".to_owned(),
            ));
        };

        let email = Email::parse(&email).map_err(|_| AuthError::InvalidCredentials)?;

        let (profile, password_hash) = self
            .customers
            .get_member_credentials(email.as_str())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&password, &password_hash)?;

        Ok(profile)
    }
}

/// Trim a submitted field, treating blank as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            name: Some("Sarah Johnson".to_owned()),
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
            phone: Some("13987654321".to_owned()),
            address: Some("Hong Kong Island".to_owned()),
            date_of_birth: Some("1990-05-15".to_owned()),
        }
    }

    fn login(email: &str, password: &str) -> Login {
        Login {
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
        }
    }

    #[test]
    fn test_hash_is_salted_phc_string() {
        let first = hash_password("123456").unwrap();
        let second = hash_password("123456").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("123456", &first).is_ok());
        assert!(matches!(
            verify_password("654321", &first),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("123456", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = connect_in_memory().await.unwrap();
        let auth = MemberAuthService::new(&pool);

        let summary = auth
            .register(registration("sarah@example.com", "123456"))
            .await
            .unwrap();
        assert_eq!(summary.email.as_str(), "sarah@example.com");

        let profile = auth.login(login("sarah@example.com", "123456")).await.unwrap();
        assert_eq!(profile.customer_id, summary.customer_id);
        assert_eq!(profile.name, "Sarah Johnson");
        assert_eq!(profile.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 15));

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let pool = connect_in_memory().await.unwrap();
        let auth = MemberAuthService::new(&pool);
        auth.register(registration("sarah@example.com", "123456"))
            .await
            .unwrap();

        for attempt in [
            login("sarah@example.com", "wrong"),
            login("nobody@example.com", "123456"),
            login("not-an-email", "123456"),
        ] {
            assert!(matches!(
                auth.login(attempt).await,
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let pool = connect_in_memory().await.unwrap();
        let auth = MemberAuthService::new(&pool);

        let missing = Login {
            email: Some("sarah@example.com".to_owned()),
            password: None,
        };
        assert!(matches!(auth.login(missing).await, Err(AuthError::Validation(_))));
        assert!(matches!(
            auth.login(Login::default()).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let pool = connect_in_memory().await.unwrap();
        let auth = MemberAuthService::new(&pool);

        let mut blank_name = registration("a@example.com", "pw");
        blank_name.name = Some("   ".to_owned());
        assert!(matches!(auth.register(blank_name).await, Err(AuthError::Validation(_))));

        let bad_email = registration("not-an-email", "pw");
        assert!(matches!(auth.register(bad_email).await, Err(AuthError::Validation(_))));

        let mut bad_dob = registration("a@example.com", "pw");
        bad_dob.date_of_birth = Some("15/05/1990".to_owned());
        assert!(matches!(auth.register(bad_dob).await, Err(AuthError::Validation(_))));

        let no_password = registration("a@example.com", "");
        assert!(matches!(auth.register(no_password).await, Err(AuthError::Validation(_))));
    }
}
