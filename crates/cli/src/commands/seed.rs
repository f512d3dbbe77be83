//! Seeding commands.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use brewdesk_server::services::seed::{self, SAMPLE_MEMBER_PASSWORD};

/// Insert reference data if the store is empty.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or an insert fails.
pub async fn reference() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    if seed::seed_reference_data(&pool).await? {
        info!(
            member = "sarah@example.com",
            password = SAMPLE_MEMBER_PASSWORD,
            "Reference data inserted"
        );
    } else {
        info!("Reference data already present, nothing to do");
    }
    Ok(())
}

/// Generate demo customers and `orders` random historical orders.
///
/// Seeds reference data first if the store is empty.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a write fails.
pub async fn demo(orders: usize) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    seed::seed_reference_data(&pool).await?;

    info!(orders, "Generating demo data");
    let mut rng = StdRng::from_os_rng();
    let summary = seed::generate_demo_data(&pool, orders, &mut rng).await?;

    info!(
        "Total sales: {} over {} orders",
        summary.total_sales, summary.total_orders
    );
    info!(
        "Most popular product: {}",
        summary.top_product.as_deref().unwrap_or("none")
    );
    info!("Active customers: {}", summary.active_customers);
    Ok(())
}
