//! Reference data and demo order generation.
//!
//! `seed_reference_data` fills an empty store with the menu and a few sample
//! customers. `generate_demo_data` adds extra customers and a month of random
//! historical orders for trying out the reports.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use sqlx::SqlitePool;
use thiserror::Error;

use brewdesk_core::{CustomerId, CustomerType, Email, Money, MoneyError, ProductId};

use super::auth::{AuthError, hash_password};
use crate::db::{
    CatalogRepository, CustomerRepository, OrderRepository, ReportRepository, RepositoryError,
};
use crate::db::catalog::{insert_category, insert_product};
use crate::db::customers::{insert_customer, insert_member_credential};
use crate::models::catalog::NewProduct;
use crate::models::customer::{NewCustomer, NewMember};
use crate::models::order::{CustomerRef, NewOrder, OrderLine};
use crate::models::report::DateRange;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Demo orders need at least one active product.
    #[error("no active products to order; seed reference data first")]
    EmptyCatalog,

    /// Hashing the sample member's password failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Summary totals did not fit in the money representation.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Coffee", "Coffee beverages"),
    ("Tea", "Tea drinks"),
    ("Dessert", "Cakes and snacks"),
    ("Light Meal", "Sandwiches and salads"),
];

/// (name, price in cents, category name)
const PRODUCTS: &[(&str, i64, &str)] = &[
    ("Americano", 2500, "Coffee"),
    ("Latte", 3200, "Coffee"),
    ("Cappuccino", 3000, "Coffee"),
    ("Mocha", 3500, "Coffee"),
    ("chinesetea", 2800, "Tea"),
    ("Milk Tea", 2200, "Tea"),
    ("Cheesecake", 3800, "Dessert"),
    ("Tiramisu", 4200, "Dessert"),
    ("Ham Sandwich", 2800, "Light Meal"),
    ("Caesar Salad", 3200, "Light Meal"),
];

/// (name, phone, email, address, type)
type CustomerSeed = (&'static str, &'static str, &'static str, &'static str, CustomerType);

const DEMO_CUSTOMERS: &[CustomerSeed] = &[
    ("Alice Johnson", "13912345678", "alice@example.com", "Kowloon", CustomerType::Regular),
    ("Bob Smith", "13823456789", "bob@example.com", "Hong Kong Island", CustomerType::Member),
    ("Carol Davis", "13734567890", "carol@example.com", "New Territories", CustomerType::Regular),
    ("David Wilson", "13645678901", "david@example.com", "Kowloon", CustomerType::Member),
    ("Emma Brown", "13556789012", "emma@example.com", "Hong Kong Island", CustomerType::Regular),
    ("Frank Miller", "13467890123", "frank@example.com", "New Territories", CustomerType::Regular),
    ("Grace Lee", "13378901234", "grace@example.com", "Kowloon", CustomerType::Member),
    ("Henry Taylor", "13289012345", "henry@example.com", "Hong Kong Island", CustomerType::Regular),
];

const PAYMENT_METHODS: &[&str] = &["cash", "card", "alipay", "wechat"];

/// Password of the sample member.
pub const SAMPLE_MEMBER_PASSWORD: &str = "123456";

/// Outcome of a demo data run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    pub customers_created: usize,
    pub orders_created: usize,
    pub total_sales: Money,
    pub total_orders: i64,
    pub top_product: Option<String>,
    pub active_customers: usize,
}

fn customer_from(seed: &CustomerSeed) -> NewCustomer {
    let (name, phone, email, address, customer_type) = *seed;
    NewCustomer {
        name: name.to_owned(),
        phone: Some(phone.to_owned()),
        email: Some(email.to_owned()),
        address: Some(address.to_owned()),
        customer_type,
    }
}

/// Insert categories, products and sample customers into an empty store.
///
/// Does nothing if any category exists. Everything is written in one
/// transaction, so a failed seed leaves the store empty and the next run
/// starts over. Returns whether data was inserted.
///
/// # Errors
///
/// Returns `SeedError` if an insert or the sample password hash fails.
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<bool, SeedError> {
    if CatalogRepository::new(pool).category_count().await? > 0 {
        tracing::debug!("Reference data already present, skipping seed");
        return Ok(false);
    }

    let sarah = NewMember {
        name: "Sarah Johnson".to_owned(),
        email: Email::parse("sarah@example.com")
            .map_err(|e| AuthError::Validation(e.to_string()))?,
        phone: Some("13987654321".to_owned()),
        address: Some("Hong Kong Island".to_owned()),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15),
    };
    let password_hash = hash_password(SAMPLE_MEMBER_PASSWORD)?;

    let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = insert_category(&mut *tx, name, Some(description)).await?;
        category_ids.push((*name, category.id));
    }

    for &(name, cents, category) in PRODUCTS {
        let category_id = category_ids
            .iter()
            .find(|(n, _)| *n == category)
            .map(|(_, id)| *id);
        let product = NewProduct {
            name: name.to_owned(),
            price: Money::from_cents(cents),
            is_active: true,
            category_id,
        };
        insert_product(&mut *tx, &product)
            .await
            .map_err(RepositoryError::from)?;
    }

    let john = customer_from(&(
        "John Smith",
        "13812345678",
        "john@example.com",
        "Kowloon",
        CustomerType::Regular,
    ));
    insert_customer(&mut *tx, &john)
        .await
        .map_err(RepositoryError::from)?;

    let sarah_id = insert_customer(&mut *tx, &sarah.customer())
        .await
        .map_err(RepositoryError::from)?;
    insert_member_credential(&mut *tx, sarah_id, &password_hash, sarah.date_of_birth)
        .await
        .map_err(RepositoryError::from)?;

    let mike = customer_from(&(
        "Mike Wilson",
        "13555666777",
        "mike@example.com",
        "New Territories",
        CustomerType::Regular,
    ));
    insert_customer(&mut *tx, &mike)
        .await
        .map_err(RepositoryError::from)?;

    tx.commit().await.map_err(RepositoryError::from)?;

    tracing::info!(
        categories = CATEGORIES.len(),
        products = PRODUCTS.len(),
        customers = 3,
        "Seeded reference data"
    );
    Ok(true)
}

/// Create demo customers and `order_count` random orders over the past 30 days.
///
/// Each order has 1 to 5 distinct active products with quantity 1 to 3 and a
/// random payment method, and is placed for a random customer.
///
/// # Errors
///
/// Returns `SeedError::EmptyCatalog` if there are no active products.
/// Returns `SeedError::Repository` if a write fails.
pub async fn generate_demo_data<R: Rng + Send>(
    pool: &SqlitePool,
    order_count: usize,
    rng: &mut R,
) -> Result<DemoSummary, SeedError> {
    let product_ids: Vec<ProductId> = CatalogRepository::new(pool)
        .list_active_products()
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if product_ids.is_empty() {
        return Err(SeedError::EmptyCatalog);
    }

    let customers = CustomerRepository::new(pool);
    for seed in DEMO_CUSTOMERS {
        let id = customers.create(&customer_from(seed)).await?;
        tracing::debug!(customer_id = %id, name = seed.0, "Created demo customer");
    }
    let customer_ids = customers.list_ids().await?;

    let orders = OrderRepository::new(pool);
    let now = Utc::now();
    let mut orders_created = 0;

    for _ in 0..order_count {
        let (customer_id, order) = random_order(rng, &customer_ids, &product_ids)?;
        let placed = orders.create(&order).await?;

        let days_ago = rng.random_range(0..=30);
        orders
            .backdate(placed.order_id, now - Duration::days(days_ago))
            .await?;

        orders_created += 1;
        tracing::debug!(
            order_id = %placed.order_id,
            customer_id = %customer_id,
            days_ago,
            "Created demo order"
        );
    }

    let reports = ReportRepository::new(pool);
    let sales = reports.sales(DateRange::default()).await?;
    let total_sales = Money::try_sum(sales.iter().map(|day| day.total_sales))?;
    let total_orders: i64 = sales.iter().map(|day| day.order_count).sum();
    let top_product = reports
        .product_sales()
        .await?
        .into_iter()
        .next()
        .map(|p| p.product_name);
    let active_customers = reports
        .customers()
        .await?
        .iter()
        .filter(|c| c.order_count > 0)
        .count();

    let summary = DemoSummary {
        customers_created: DEMO_CUSTOMERS.len(),
        orders_created,
        total_sales,
        total_orders,
        top_product,
        active_customers,
    };

    tracing::info!(
        customers_created = summary.customers_created,
        orders_created = summary.orders_created,
        total_sales = %summary.total_sales,
        total_orders = summary.total_orders,
        avg_order_value = %summary.total_sales.average_over(summary.total_orders),
        top_product = summary.top_product.as_deref().unwrap_or("none"),
        active_customers = summary.active_customers,
        "Demo data generated"
    );
    Ok(summary)
}

fn random_order<R: Rng>(
    rng: &mut R,
    customer_ids: &[CustomerId],
    product_ids: &[ProductId],
) -> Result<(CustomerId, NewOrder), SeedError> {
    let customer_id = *customer_ids
        .choose(rng)
        .ok_or_else(|| RepositoryError::NotFound("customers".to_owned()))?;

    let wanted = rng.random_range(1..=5).min(product_ids.len());
    let items = product_ids
        .choose_multiple(rng, wanted)
        .map(|&product_id| OrderLine {
            product_id,
            quantity: rng.random_range(1..=3),
        })
        .collect::<Vec<_>>();

    let payment_method = PAYMENT_METHODS.choose(rng).copied().unwrap_or("cash");

    Ok((
        customer_id,
        NewOrder {
            customer: CustomerRef::Existing(customer_id),
            payment_method: payment_method.to_owned(),
            items,
        },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::db::connect_in_memory;
    use crate::services::auth::{Login, MemberAuthService};

    #[tokio::test]
    async fn test_reference_seed_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();

        assert!(seed_reference_data(&pool).await.unwrap());
        assert!(!seed_reference_data(&pool).await.unwrap());

        let catalog = CatalogRepository::new(&pool);
        assert_eq!(catalog.category_count().await.unwrap(), 4);
        let products = catalog.list_active_products().await.unwrap();
        assert_eq!(products.len(), 10);

        let latte = products.iter().find(|p| p.name == "Latte").unwrap();
        assert_eq!(latte.price, Money::from_cents(3200));
        assert_eq!(latte.category.as_deref(), Some("Coffee"));

        assert_eq!(CustomerRepository::new(&pool).list_ids().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_reference_seed_leaves_store_empty() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_customer BEFORE INSERT ON customer \
             BEGIN SELECT RAISE(ABORT, 'customer inserts disabled'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = seed_reference_data(&pool).await.unwrap_err();
        assert!(matches!(err, SeedError::Repository(_)));

        let catalog = CatalogRepository::new(&pool);
        assert_eq!(catalog.category_count().await.unwrap(), 0);
        assert!(catalog.list_active_products().await.unwrap().is_empty());

        sqlx::query("DROP TRIGGER reject_customer")
            .execute(&pool)
            .await
            .unwrap();
        assert!(seed_reference_data(&pool).await.unwrap());
        assert_eq!(catalog.category_count().await.unwrap(), 4);
        assert_eq!(CustomerRepository::new(&pool).list_ids().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sample_member_can_log_in() {
        let pool = connect_in_memory().await.unwrap();
        seed_reference_data(&pool).await.unwrap();

        let profile = MemberAuthService::new(&pool)
            .login(Login {
                email: Some("sarah@example.com".to_owned()),
                password: Some(SAMPLE_MEMBER_PASSWORD.to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(profile.name, "Sarah Johnson");
        assert_eq!(profile.customer_id, CustomerId::new(2));
        assert_eq!(profile.customer_type, CustomerType::Member);
    }

    #[tokio::test]
    async fn test_demo_data_requires_products() {
        let pool = connect_in_memory().await.unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let err = generate_demo_data(&pool, 5, &mut rng).await.unwrap_err();
        assert!(matches!(err, SeedError::EmptyCatalog));
    }

    #[tokio::test]
    async fn test_demo_orders_are_spread_over_past_month() {
        let pool = connect_in_memory().await.unwrap();
        seed_reference_data(&pool).await.unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let summary = generate_demo_data(&pool, 20, &mut rng).await.unwrap();
        assert_eq!(summary.customers_created, 8);
        assert_eq!(summary.orders_created, 20);
        assert_eq!(summary.total_orders, 20);
        assert!(summary.total_sales > Money::ZERO);
        assert!(summary.top_product.is_some());
        assert!(summary.active_customers >= 1);

        let history = OrderRepository::new(&pool).history(None).await.unwrap();
        assert_eq!(history.len(), 20);
        let oldest_allowed = Utc::now() - Duration::days(31);
        assert!(history.iter().all(|o| o.order_date > oldest_allowed));
        assert!(
            history
                .iter()
                .all(|o| PAYMENT_METHODS.contains(&o.payment_method.as_str()))
        );
    }
}
