//! Customer repository for database operations.
//!
//! Covers walk-in customers and members. A member is a `customer` row of type
//! `member` plus exactly one `member_credential` row; both are written in the
//! same transaction.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use brewdesk_core::{CustomerId, CustomerType};

use super::RepositoryError;
use crate::models::customer::{MemberProfile, MemberSummary, NewCustomer, NewMember};

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    customer_id: CustomerId,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    customer_type: String,
    password_hash: String,
    date_of_birth: Option<NaiveDate>,
    registered_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_profile(self) -> Result<(MemberProfile, String), RepositoryError> {
        let customer_type = self
            .customer_type
            .parse::<CustomerType>()
            .map_err(RepositoryError::DataCorruption)?;

        let profile = MemberProfile {
            customer_id: self.customer_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            customer_type,
            date_of_birth: self.date_of_birth,
            registration_date: self.registered_at,
        };
        Ok((profile, self.password_hash))
    }
}

/// Insert a customer row using any executor (pool or open transaction).
pub(crate) async fn insert_customer<'e, E>(
    executor: E,
    customer: &NewCustomer,
) -> Result<CustomerId, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, CustomerId>(
        r"
        INSERT INTO customer (name, phone, email, address, customer_type)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        ",
    )
    .bind(customer.name.as_str())
    .bind(customer.phone.as_deref())
    .bind(customer.email.as_deref())
    .bind(customer.address.as_deref())
    .bind(customer.customer_type.as_str())
    .fetch_one(executor)
    .await
}

/// Whether a customer with this id exists.
pub(crate) async fn customer_exists<'e, E>(executor: E, id: CustomerId) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM customer WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

/// Attach a password credential to an existing customer.
pub(crate) async fn insert_member_credential<'e, E>(
    executor: E,
    customer_id: CustomerId,
    password_hash: &str,
    date_of_birth: Option<NaiveDate>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO member_credential (customer_id, password_hash, date_of_birth, registered_at)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(customer_id)
    .bind(password_hash)
    .bind(date_of_birth)
    .bind(Utc::now())
    .execute(executor)
    .await?;
    Ok(())
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a customer. Duplicate names, phones and emails are allowed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, customer: &NewCustomer) -> Result<CustomerId, RepositoryError> {
        Ok(insert_customer(self.pool, customer).await?)
    }

    /// Whether a customer with this id exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        Ok(customer_exists(self.pool, id).await?)
    }

    /// All customer ids in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_ids(&self) -> Result<Vec<CustomerId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, CustomerId>("SELECT id FROM customer ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(ids)
    }

    /// Create a member: a `member` customer and its credential, atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either insert fails; nothing is
    /// persisted in that case.
    pub async fn create_member(
        &self,
        member: &NewMember,
        password_hash: &str,
    ) -> Result<MemberSummary, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer = member.customer();
        let customer_id = insert_customer(&mut *tx, &customer).await?;
        insert_member_credential(&mut *tx, customer_id, password_hash, member.date_of_birth)
            .await?;

        tx.commit().await?;

        Ok(MemberSummary {
            customer_id,
            name: member.name.clone(),
            email: member.email.clone(),
        })
    }

    /// Get a member's profile and password hash by exact email.
    ///
    /// When several members share an email, the most recently registered
    /// one wins. Returns `None` if no member has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored customer type is invalid.
    pub async fn get_member_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(MemberProfile, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r"
            SELECT c.id AS customer_id, c.name, c.phone, c.email, c.address, c.customer_type,
                   m.password_hash, m.date_of_birth, m.registered_at
            FROM customer c
            JOIN member_credential m ON m.customer_id = c.id
            WHERE c.email = ?
            ORDER BY m.registered_at DESC, c.id DESC
            LIMIT 1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(MemberRow::into_profile).transpose()
    }
}
