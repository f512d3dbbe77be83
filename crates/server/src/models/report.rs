//! Reporting types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use brewdesk_core::{CustomerType, Money};

/// Inclusive calendar-date bounds for the sales report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Sales totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub order_count: i64,
    pub total_sales: Money,
    pub avg_order_value: Money,
}

/// Lifetime sales for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_name: String,
    pub category: Option<String>,
    pub total_quantity: i64,
    pub total_revenue: Money,
    /// Number of distinct orders containing the product.
    pub order_count: i64,
}

/// Lifetime spend for one customer. Customers without orders report zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSpend {
    pub customer_name: String,
    pub customer_type: CustomerType,
    pub order_count: i64,
    pub total_spent: Money,
    pub avg_order_value: Money,
    pub last_order_date: Option<DateTime<Utc>>,
}
