//! Catalog route handlers.

use axum::{Json, extract::State};

use crate::api::DataResponse;
use crate::db::CatalogRepository;
use crate::error::Result;
use crate::models::{Category, ProductListing};
use crate::state::AppState;

/// List active products, grouped by category name.
#[tracing::instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<ProductListing>>>> {
    let products = CatalogRepository::new(state.pool())
        .list_active_products()
        .await?;
    Ok(Json(DataResponse::new(products)))
}

/// List all categories.
#[tracing::instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<DataResponse<Vec<Category>>>> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;
    Ok(Json(DataResponse::new(categories)))
}
