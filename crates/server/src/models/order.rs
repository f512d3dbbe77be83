//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use brewdesk_core::{CustomerId, Money, OrderId, OrderStatus, ProductId};

use super::customer::NewCustomer;

/// Who an order is for.
#[derive(Debug, Clone)]
pub enum CustomerRef {
    /// A customer that already exists.
    Existing(CustomerId),
    /// A walk-in customer created together with the order.
    New(NewCustomer),
}

/// One requested line of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A validated order request.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: CustomerRef,
    pub payment_method: String,
    pub items: Vec<OrderLine>,
}

/// Result of placing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub total: Money,
}

/// One row of the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub payment_method: String,
    pub total_amount: Money,
}

/// One item of a placed order, with the price captured at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemDetail {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_amount: Money,
}
