//! Fixed-point currency amounts.
//!
//! Prices and totals are stored as integer cents and surfaced as a
//! [`Decimal`] with scale 2. Arithmetic stays in cents so order totals are
//! exact sums of their line amounts.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Number of decimal places carried by every amount.
const SCALE: u32 = 2;

/// Errors that can occur when building a [`Money`] value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount is negative.
    #[error("amount cannot be negative")]
    Negative,
    /// The amount has more than two decimal places.
    #[error("amount must have at most {SCALE} decimal places")]
    TooPrecise,
    /// The amount does not fit in the cents representation.
    #[error("amount is out of range")]
    OutOfRange,
}

/// A non-negative currency amount with cent precision.
///
/// Serializes as a JSON number (e.g. `32.0`) so API consumers receive plain
/// numeric prices.
///
/// ```
/// use brewdesk_core::Money;
///
/// let latte = Money::from_cents(3200);
/// assert_eq!(latte.checked_times(2), Some(Money::from_cents(6400)));
/// assert_eq!(latte.to_string(), "32.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self { cents: 0 };

    /// Create an amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create an amount from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` if the value is negative, has more than two
    /// decimal places, or does not fit in `i64` cents.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative);
        }
        let normalized = value.normalize();
        if normalized.scale() > SCALE {
            return Err(MoneyError::TooPrecise);
        }
        let cents = (normalized * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or(MoneyError::OutOfRange)?;
        Ok(Self { cents })
    }

    /// Amount in cents, as persisted.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Amount as a decimal with two decimal places.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.cents, SCALE)
    }

    /// Multiply by an item quantity. `None` on overflow or a negative quantity.
    #[must_use]
    pub const fn checked_times(self, quantity: i64) -> Option<Self> {
        if quantity < 0 {
            return None;
        }
        match self.cents.checked_mul(quantity) {
            Some(cents) => Some(Self { cents }),
            None => None,
        }
    }

    /// Add two amounts. `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.cents.checked_add(other.cents) {
            Some(cents) => Some(Self { cents }),
            None => None,
        }
    }

    /// Sum amounts, failing instead of wrapping.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::OutOfRange` if the total does not fit in `i64` cents.
    pub fn try_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Result<Self, MoneyError> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
            .ok_or(MoneyError::OutOfRange)
    }

    /// Average of `self` over `count` entries, rounded half-even to the cent.
    ///
    /// Returns zero when `count` is zero.
    #[must_use]
    pub fn average_over(self, count: i64) -> Self {
        if count <= 0 {
            return Self::ZERO;
        }
        let average = (Decimal::from(self.cents) / Decimal::from(count)).round();
        Self {
            cents: average.to_i64().unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.amount().to_string())
    }
}

impl Serialize for Money {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.amount(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::from_decimal(value).map_err(serde::de::Error::custom)
    }
}
