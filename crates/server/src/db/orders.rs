//! Order repository.
//!
//! Placing an order writes the customer (when created inline), the order
//! header and every line in a single transaction. Unit prices are copied from
//! the product at order time, so later price changes never rewrite history.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use brewdesk_core::{CustomerId, Money, OrderId, OrderStatus, ProductId};

use super::RepositoryError;
use super::customers::{customer_exists, insert_customer};
use crate::models::order::{
    CustomerRef, NewOrder, OrderItemDetail, OrderSummary, PlacedOrder,
};

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    order_id: OrderId,
    customer_name: String,
    order_date: DateTime<Utc>,
    status: String,
    payment_method: String,
    total_cents: i64,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(row: OrderSummaryRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            order_id: row.order_id,
            customer_name: row.customer_name,
            order_date: row.order_date,
            status,
            payment_method: row.payment_method,
            total_amount: Money::from_cents(row.total_cents),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    product_id: ProductId,
    product_name: String,
    quantity: i64,
    unit_price_cents: i64,
    line_cents: i64,
}

impl From<OrderItemRow> for OrderItemDetail {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
            line_amount: Money::from_cents(row.line_cents),
        }
    }
}

/// Largest total a single order may carry (100 million, in cents). Keeps
/// report sums over the order table far from `i64` overflow.
pub const MAX_ORDER_TOTAL: Money = Money::from_cents(10_000_000_000);

/// A priced order line, ready to insert.
struct PricedLine {
    product_id: ProductId,
    quantity: i64,
    unit_price: Money,
    line_amount: Money,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an order atomically.
    ///
    /// Either every row (inline customer, order, items) is committed or none
    /// is. The total is the exact sum of the line amounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the referenced customer or any
    /// product does not exist.
    /// Returns `RepositoryError::Invalid` if a line amount or the total
    /// overflows or the total exceeds [`MAX_ORDER_TOTAL`].
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, order: &NewOrder) -> Result<PlacedOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer_id = match &order.customer {
            CustomerRef::Existing(id) => {
                if !customer_exists(&mut *tx, *id).await? {
                    return Err(RepositoryError::NotFound(format!("customer {id}")));
                }
                *id
            }
            CustomerRef::New(customer) => insert_customer(&mut *tx, customer).await?,
        };

        let mut lines = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let price_cents =
                sqlx::query_scalar::<_, i64>("SELECT price_cents FROM product WHERE id = ?")
                    .bind(item.product_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        RepositoryError::NotFound(format!("product {}", item.product_id))
                    })?;

            let unit_price = Money::from_cents(price_cents);
            let line_amount = unit_price.checked_times(item.quantity).ok_or_else(|| {
                RepositoryError::Invalid(format!(
                    "Line amount for product {} is out of range",
                    item.product_id
                ))
            })?;
            lines.push(PricedLine {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price,
                line_amount,
            });
        }
        let total = Money::try_sum(lines.iter().map(|line| line.line_amount))
            .ok()
            .filter(|total| *total <= MAX_ORDER_TOTAL)
            .ok_or_else(|| {
                RepositoryError::Invalid(format!(
                    "Order total must not exceed {MAX_ORDER_TOTAL}"
                ))
            })?;

        let order_id = sqlx::query_scalar::<_, OrderId>(
            r"
            INSERT INTO customer_order (customer_id, order_date, status, payment_method, total_cents)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(customer_id)
        .bind(Utc::now())
        .bind(OrderStatus::Pending.as_str())
        .bind(order.payment_method.as_str())
        .bind(total.cents())
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO order_item (order_id, product_id, quantity, unit_price_cents, line_cents)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price.cents())
            .bind(line.line_amount.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            order_id = %order_id,
            customer_id = %customer_id,
            lines = lines.len(),
            total = %total,
            "Order placed"
        );

        Ok(PlacedOrder {
            order_id,
            customer_id,
            total,
        })
    }

    /// List orders newest first, optionally for one customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn history(
        &self,
        customer_id: Option<CustomerId>,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT o.id AS order_id, c.name AS customer_name, o.order_date, o.status,
                   o.payment_method, o.total_cents
            FROM customer_order o
            JOIN customer c ON c.id = o.customer_id
            WHERE ?1 IS NULL OR o.customer_id = ?1
            ORDER BY o.order_date DESC, o.id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderSummary::try_from).collect()
    }

    /// List the items of one order in insertion order.
    ///
    /// An unknown order id yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn details(&self, order_id: OrderId) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.product_id, p.name AS product_name, oi.quantity,
                   oi.unit_price_cents, oi.line_cents
            FROM order_item oi
            JOIN product p ON p.id = oi.product_id
            WHERE oi.order_id = ?
            ORDER BY oi.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItemDetail::from).collect())
    }

    /// Move an order's timestamp, used when generating historical demo data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn backdate(
        &self,
        order_id: OrderId,
        order_date: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE customer_order SET order_date = ? WHERE id = ?")
            .bind(order_date)
            .bind(order_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("order {order_id}")));
        }
        Ok(())
    }

    /// Total number of orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customer_order")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::db::{CatalogRepository, CustomerRepository, connect_in_memory};
    use crate::models::catalog::NewProduct;
    use crate::models::customer::NewCustomer;
    use crate::models::order::OrderLine;

    struct Fixture {
        pool: SqlitePool,
        john: CustomerId,
        americano: ProductId,
        latte: ProductId,
    }

    async fn fixture() -> Fixture {
        let pool = connect_in_memory().await.unwrap();
        let catalog = CatalogRepository::new(&pool);
        let coffee = catalog.create_category("Coffee", None).await.unwrap();

        let product = |name: &str, cents: i64| NewProduct {
            name: name.to_owned(),
            price: Money::from_cents(cents),
            is_active: true,
            category_id: Some(coffee.id),
        };
        let americano = catalog.create_product(&product("Americano", 2500)).await.unwrap();
        let latte = catalog.create_product(&product("Latte", 3200)).await.unwrap();

        let john = CustomerRepository::new(&pool)
            .create(&NewCustomer {
                name: "John Smith".to_owned(),
                ..NewCustomer::default()
            })
            .await
            .unwrap();

        Fixture {
            pool,
            john,
            americano,
            latte,
        }
    }

    fn line(product_id: ProductId, quantity: i64) -> OrderLine {
        OrderLine {
            product_id,
            quantity,
        }
    }

    async fn place(
        repo: &OrderRepository<'_>,
        customer: CustomerRef,
        product_id: ProductId,
    ) -> PlacedOrder {
        repo.create(&NewOrder {
            customer,
            payment_method: "cash".to_owned(),
            items: vec![line(product_id, 1)],
        })
        .await
        .unwrap()
    }

    async fn table_count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_total_is_sum_of_lines() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        let placed = repo
            .create(&NewOrder {
                customer: CustomerRef::Existing(f.john),
                payment_method: "cash".to_owned(),
                items: vec![line(f.americano, 1), line(f.latte, 2)],
            })
            .await
            .unwrap();

        assert_eq!(placed.customer_id, f.john);
        assert_eq!(placed.total, Money::from_cents(2500 + 2 * 3200));

        let items = repo.details(placed.order_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].product_name, "Latte");
        assert_eq!(items[1].unit_price, Money::from_cents(3200));
        assert_eq!(items[1].line_amount, Money::from_cents(6400));
        let sum = Money::try_sum(items.iter().map(|i| i.line_amount)).unwrap();
        assert_eq!(sum, placed.total);
    }

    #[tokio::test]
    async fn test_inline_customer_created_with_order() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        let placed = repo
            .create(&NewOrder {
                customer: CustomerRef::New(NewCustomer {
                    name: "Walk-in".to_owned(),
                    ..NewCustomer::default()
                }),
                payment_method: "card".to_owned(),
                items: vec![line(f.latte, 2)],
            })
            .await
            .unwrap();

        assert_ne!(placed.customer_id, f.john);
        assert_eq!(placed.total.to_string(), "64.00");

        let history = repo.history(Some(placed.customer_id)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].customer_name, "Walk-in");
        assert_eq!(history[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_everything() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);
        let customers_before = table_count(&f.pool, "customer").await;

        let err = repo
            .create(&NewOrder {
                customer: CustomerRef::New(NewCustomer {
                    name: "Ghost".to_owned(),
                    ..NewCustomer::default()
                }),
                payment_method: "cash".to_owned(),
                items: vec![
                    line(f.americano, 1),
                    line(f.latte, 1),
                    line(ProductId::new(9999), 1),
                ],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound(ref what) if what == "product 9999"));
        assert_eq!(table_count(&f.pool, "customer_order").await, 0);
        assert_eq!(table_count(&f.pool, "order_item").await, 0);
        assert_eq!(table_count(&f.pool, "customer").await, customers_before);
    }

    #[tokio::test]
    async fn test_oversized_quantity_is_rejected_without_writes() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        for quantity in [3_000_000_000_000_000, 4_000_000] {
            let err = repo
                .create(&NewOrder {
                    customer: CustomerRef::Existing(f.john),
                    payment_method: "cash".to_owned(),
                    items: vec![line(f.latte, quantity)],
                })
                .await
                .unwrap_err();
            assert!(matches!(err, RepositoryError::Invalid(_)), "quantity {quantity}");
        }

        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(table_count(&f.pool, "order_item").await, 0);
    }

    #[tokio::test]
    async fn test_total_at_limit_is_accepted() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        // 3200 cents x 3_125_000 = exactly the limit
        let placed = repo
            .create(&NewOrder {
                customer: CustomerRef::Existing(f.john),
                payment_method: "cash".to_owned(),
                items: vec![line(f.latte, 3_125_000)],
            })
            .await
            .unwrap();
        assert_eq!(placed.total, MAX_ORDER_TOTAL);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        let err = repo
            .create(&NewOrder {
                customer: CustomerRef::Existing(CustomerId::new(404)),
                payment_method: "cash".to_owned(),
                items: vec![line(f.americano, 1)],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_price_change_does_not_rewrite_history() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        let placed = repo
            .create(&NewOrder {
                customer: CustomerRef::Existing(f.john),
                payment_method: "cash".to_owned(),
                items: vec![line(f.latte, 1)],
            })
            .await
            .unwrap();

        sqlx::query("UPDATE product SET price_cents = 9900 WHERE id = ?")
            .bind(f.latte)
            .execute(&f.pool)
            .await
            .unwrap();

        let items = repo.details(placed.order_id).await.unwrap();
        assert_eq!(items[0].unit_price, Money::from_cents(3200));
        let history = repo.history(None).await.unwrap();
        assert_eq!(history[0].total_amount, Money::from_cents(3200));
    }

    #[tokio::test]
    async fn test_history_newest_first_and_filtered() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        let oldest = place(&repo, CustomerRef::Existing(f.john), f.americano).await;
        let other = place(
            &repo,
            CustomerRef::New(NewCustomer {
                name: "Sarah Johnson".to_owned(),
                ..NewCustomer::default()
            }),
            f.americano,
        )
        .await;
        let newest = place(&repo, CustomerRef::Existing(f.john), f.americano).await;

        let now = Utc::now();
        repo.backdate(oldest.order_id, now - Duration::days(2))
            .await
            .unwrap();
        repo.backdate(other.order_id, now - Duration::days(1))
            .await
            .unwrap();

        let all = repo.history(None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, [newest.order_id, other.order_id, oldest.order_id]);

        let johns = repo.history(Some(f.john)).await.unwrap();
        let ids: Vec<_> = johns.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, [newest.order_id, oldest.order_id]);

        assert!(repo.history(Some(CustomerId::new(404))).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_order_details_and_backdate() {
        let f = fixture().await;
        let repo = OrderRepository::new(&f.pool);

        assert!(repo.details(OrderId::new(77)).await.unwrap().is_empty());
        let err = repo.backdate(OrderId::new(77), Utc::now()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
