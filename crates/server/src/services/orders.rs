//! Order placement service.
//!
//! Turns a loosely-typed order request into a validated [`NewOrder`] and hands
//! it to the repository, which prices and stores it atomically.

use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;

use brewdesk_core::{CustomerId, CustomerType, ProductId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::customer::NewCustomer;
use crate::models::order::{CustomerRef, NewOrder, OrderLine, PlacedOrder};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request is incomplete or malformed.
    #[error("{0}")]
    Validation(String),

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Largest quantity accepted for a single order line.
pub const MAX_ITEM_QUANTITY: i64 = 1000;

/// One requested item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i64>,
}

/// An order as submitted by the till.
///
/// Either `customer_id` names an existing customer, or `customer_name` (with
/// optional contact fields) creates a walk-in customer alongside the order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRequest {
    pub customer_id: Option<CustomerId>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub payment_method: Option<String>,
    pub items: Option<Vec<OrderItemRequest>>,
}

impl OrderRequest {
    /// Validate the request without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` describing the first problem found.
    pub fn validate(self) -> Result<NewOrder, OrderError> {
        let payment_method = trimmed(self.payment_method)
            .ok_or_else(|| invalid("payment_method is required"))?;

        let items = self.items.unwrap_or_default();
        if items.is_empty() {
            return Err(invalid("Order must contain at least one item"));
        }
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let product_id = item
                    .product_id
                    .ok_or_else(|| invalid(format!("items[{index}].product_id is required")))?;
                let quantity = item
                    .quantity
                    .filter(|q| (1..=MAX_ITEM_QUANTITY).contains(q))
                    .ok_or_else(|| {
                        invalid(format!(
                            "items[{index}].quantity must be between 1 and {MAX_ITEM_QUANTITY}"
                        ))
                    })?;
                Ok(OrderLine {
                    product_id,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, OrderError>>()?;

        let customer = if let Some(id) = self.customer_id {
            CustomerRef::Existing(id)
        } else {
            let name = trimmed(self.customer_name)
                .ok_or_else(|| invalid("customer_id or customer_name is required"))?;
            CustomerRef::New(NewCustomer {
                name,
                phone: trimmed(self.customer_phone),
                email: trimmed(self.customer_email),
                address: trimmed(self.customer_address),
                customer_type: CustomerType::Regular,
            })
        };

        Ok(NewOrder {
            customer,
            payment_method,
            items,
        })
    }
}

/// Order placement service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Validate and place an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an invalid request.
    /// Returns `OrderError::Repository` with `RepositoryError::NotFound` if
    /// the customer or a product does not exist, or with another variant if
    /// the store fails. Nothing is persisted on error.
    pub async fn place(&self, request: OrderRequest) -> Result<PlacedOrder, OrderError> {
        let order = request.validate()?;
        let placed = self.orders.create(&order).await?;

        tracing::info!(
            order_id = %placed.order_id,
            customer_id = %placed.customer_id,
            total = %placed.total,
            payment_method = %order.payment_method,
            "Order created"
        );
        Ok(placed)
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn invalid(message: impl Into<String>) -> OrderError {
    OrderError::Validation(message.into())
}
