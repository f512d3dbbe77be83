//! Status and classification enums.
//!
//! Both enums are persisted as lowercase text columns; the server converts
//! them with `FromStr`/`Display` at the row boundary.

use serde::{Deserialize, Serialize};

/// Whether a customer is a walk-in or a registered member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    /// Walk-in customer, created at the till or with an order.
    #[default]
    Regular,
    /// Customer with a login credential.
    Member,
}

impl CustomerType {
    /// Database and API representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for CustomerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "member" => Ok(Self::Member),
            _ => Err(format!("invalid customer type: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// Orders are created `Pending`. No operation moves them out of that state
/// yet; the remaining variants exist so persisted values round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Database and API representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_type_round_trip_through_text() {
        for ty in [CustomerType::Regular, CustomerType::Member] {
            assert_eq!(ty.to_string().parse::<CustomerType>().unwrap(), ty);
        }
        assert!("vip".parse::<CustomerType>().is_err());
    }

    #[test]
    fn test_order_status_defaults_to_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"pending\"");
    }
}
