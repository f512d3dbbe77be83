//! Read-only reporting queries.
//!
//! Sums are computed in SQL over integer cents; averages are derived from
//! those sums in Rust so no floating point is involved.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use brewdesk_core::{CustomerType, Money};

use super::RepositoryError;
use crate::models::report::{CustomerSpend, DailySales, DateRange, ProductSales};

#[derive(Debug, sqlx::FromRow)]
struct DailySalesRow {
    date: NaiveDate,
    order_count: i64,
    total_cents: i64,
}

impl From<DailySalesRow> for DailySales {
    fn from(row: DailySalesRow) -> Self {
        let total = Money::from_cents(row.total_cents);
        Self {
            date: row.date,
            order_count: row.order_count,
            total_sales: total,
            avg_order_value: total.average_over(row.order_count),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductSalesRow {
    product_name: String,
    category: Option<String>,
    total_quantity: i64,
    revenue_cents: i64,
    order_count: i64,
}

impl From<ProductSalesRow> for ProductSales {
    fn from(row: ProductSalesRow) -> Self {
        Self {
            product_name: row.product_name,
            category: row.category,
            total_quantity: row.total_quantity,
            total_revenue: Money::from_cents(row.revenue_cents),
            order_count: row.order_count,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerSpendRow {
    customer_name: String,
    customer_type: String,
    order_count: i64,
    spent_cents: i64,
    last_order_date: Option<DateTime<Utc>>,
}

impl TryFrom<CustomerSpendRow> for CustomerSpend {
    type Error = RepositoryError;

    fn try_from(row: CustomerSpendRow) -> Result<Self, Self::Error> {
        let customer_type = row
            .customer_type
            .parse::<CustomerType>()
            .map_err(RepositoryError::DataCorruption)?;
        let spent = Money::from_cents(row.spent_cents);

        Ok(Self {
            customer_name: row.customer_name,
            customer_type,
            order_count: row.order_count,
            total_spent: spent,
            avg_order_value: spent.average_over(row.order_count),
            last_order_date: row.last_order_date,
        })
    }
}

/// Repository for sales, product and customer reports.
pub struct ReportRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Daily sales grouped by UTC calendar date, newest date first.
    ///
    /// Both bounds of `range` are inclusive; a missing bound is open.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales(&self, range: DateRange) -> Result<Vec<DailySales>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySalesRow>(
            r"
            SELECT DATE(order_date) AS date,
                   COUNT(*) AS order_count,
                   COALESCE(SUM(total_cents), 0) AS total_cents
            FROM customer_order
            WHERE (?1 IS NULL OR DATE(order_date) >= ?1)
              AND (?2 IS NULL OR DATE(order_date) <= ?2)
            GROUP BY DATE(order_date)
            ORDER BY date DESC
            ",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(DailySales::from).collect())
    }

    /// Lifetime sales per product that has been ordered, highest revenue first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_sales(&self) -> Result<Vec<ProductSales>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r"
            SELECT p.name AS product_name,
                   c.name AS category,
                   SUM(oi.quantity) AS total_quantity,
                   SUM(oi.line_cents) AS revenue_cents,
                   COUNT(DISTINCT oi.order_id) AS order_count
            FROM order_item oi
            JOIN product p ON p.id = oi.product_id
            LEFT JOIN category c ON c.id = p.category_id
            GROUP BY p.id, p.name, c.name
            ORDER BY revenue_cents DESC, p.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductSales::from).collect())
    }

    /// Lifetime spend for every customer, biggest spender first.
    ///
    /// Customers without orders are included with zero totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored customer type is invalid.
    pub async fn customers(&self) -> Result<Vec<CustomerSpend>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerSpendRow>(
            r"
            SELECT c.name AS customer_name,
                   c.customer_type,
                   COUNT(o.id) AS order_count,
                   COALESCE(SUM(o.total_cents), 0) AS spent_cents,
                   MAX(o.order_date) AS last_order_date
            FROM customer c
            LEFT JOIN customer_order o ON o.customer_id = c.id
            GROUP BY c.id, c.name, c.customer_type
            ORDER BY spent_cents DESC, c.name, c.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CustomerSpend::try_from).collect()
    }
}
