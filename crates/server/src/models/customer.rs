//! Customer and member domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use brewdesk_core::{CustomerId, CustomerType, Email};

/// Input for creating a customer row.
///
/// Contact fields are free text; duplicates across customers are allowed.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: CustomerType,
}

/// Input for registering a member (customer + credential).
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl NewMember {
    /// The `member` customer row behind this registration.
    #[must_use]
    pub fn customer(&self) -> NewCustomer {
        NewCustomer {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: Some(self.email.as_str().to_owned()),
            address: self.address.clone(),
            customer_type: CustomerType::Member,
        }
    }
}

/// Returned after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: Email,
}

/// A member's profile as returned by login.
///
/// Deliberately carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberProfile {
    pub customer_id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: CustomerType,
    pub date_of_birth: Option<NaiveDate>,
    pub registration_date: DateTime<Utc>,
}
