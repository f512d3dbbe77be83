//! Catalog domain types.

use serde::Serialize;

use brewdesk_core::{CategoryId, Money, ProductId};

/// An active product as shown on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub is_active: bool,
    /// Category name, if the product is categorised.
    pub category: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub is_active: bool,
    pub category_id: Option<CategoryId>,
}
