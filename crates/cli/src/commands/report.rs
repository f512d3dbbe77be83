//! Report commands.
//!
//! Reports are printed as `tracing` info lines, one per row.

use chrono::NaiveDate;
use tracing::info;

use brewdesk_core::Money;
use brewdesk_server::db::ReportRepository;
use brewdesk_server::models::DateRange;

/// Print daily sales between optional inclusive bounds.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the query fails.
pub async fn sales(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let rows = ReportRepository::new(&pool)
        .sales(DateRange { start, end })
        .await?;

    for row in &rows {
        info!(
            "{}  orders={:>4}  sales={:>10}  avg={:>8}",
            row.date, row.order_count, row.total_sales, row.avg_order_value
        );
    }

    let total = Money::try_sum(rows.iter().map(|r| r.total_sales))?;
    let orders: i64 = rows.iter().map(|r| r.order_count).sum();
    info!(days = rows.len(), orders, total = %total, "Sales report");
    Ok(())
}

/// Print product sales, highest revenue first.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the query fails.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let rows = ReportRepository::new(&pool).product_sales().await?;

    for row in &rows {
        info!(
            "{:<16} {:<12} qty={:>4}  revenue={:>10}  orders={:>4}",
            row.product_name,
            row.category.as_deref().unwrap_or("-"),
            row.total_quantity,
            row.total_revenue,
            row.order_count
        );
    }
    info!(products = rows.len(), "Product report");
    Ok(())
}

/// Print customer spend, biggest spender first.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the query fails.
pub async fn customers() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let rows = ReportRepository::new(&pool).customers().await?;

    for row in &rows {
        let last = row
            .last_order_date
            .map_or_else(|| "never".to_owned(), |d| d.format("%Y-%m-%d %H:%M").to_string());
        info!(
            "{:<16} {:<8} orders={:>4}  spent={:>10}  avg={:>8}  last={}",
            row.customer_name,
            row.customer_type,
            row.order_count,
            row.total_spent,
            row.avg_order_value,
            last
        );
    }

    let active = rows.iter().filter(|r| r.order_count > 0).count();
    info!(customers = rows.len(), active, "Customer report");
    Ok(())
}
