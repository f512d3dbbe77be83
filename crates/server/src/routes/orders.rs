//! Order route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use brewdesk_core::{CustomerId, OrderId};

use crate::api::{ApiJson, ApiPath, ApiQuery, DataResponse, OrderCreated};
use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{OrderItemDetail, OrderSummary};
use crate::services::orders::{OrderRequest, OrderService};
use crate::state::AppState;

/// Query parameters for the order history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub customer_id: Option<CustomerId>,
}

/// Place an order.
#[tracing::instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OrderRequest>,
) -> Result<Json<OrderCreated>> {
    let placed = OrderService::new(state.pool()).place(request).await?;
    Ok(Json(OrderCreated::new(placed.order_id)))
}

/// Order history, newest first.
#[tracing::instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn history(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<DataResponse<Vec<OrderSummary>>>> {
    let orders = OrderRepository::new(state.pool())
        .history(query.customer_id)
        .await?;
    Ok(Json(DataResponse::new(orders)))
}

/// Items of one order.
#[tracing::instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn details(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<Json<DataResponse<Vec<OrderItemDetail>>>> {
    let items = OrderRepository::new(state.pool()).details(order_id).await?;
    Ok(Json(DataResponse::new(items)))
}
