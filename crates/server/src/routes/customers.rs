//! Customer route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use brewdesk_core::CustomerType;

use crate::api::{ApiJson, CustomerCreated};
use crate::db::CustomerRepository;
use crate::error::{AppError, Result};
use crate::models::NewCustomer;
use crate::state::AppState;

/// Request body for `POST /api/customers`.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: Option<CustomerType>,
}

/// Create a customer.
#[tracing::instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCustomerRequest>,
) -> Result<Json<CustomerCreated>> {
    let name = optional_text(request.name)
        .ok_or_else(|| AppError::BadRequest("Customer name is required".to_owned()))?;

    let customer = NewCustomer {
        name,
        phone: optional_text(request.phone),
        email: optional_text(request.email),
        address: optional_text(request.address),
        customer_type: request.customer_type.unwrap_or_default(),
    };
    let customer_id = CustomerRepository::new(state.pool()).create(&customer).await?;

    tracing::info!(customer_id = %customer_id, "Customer created");
    Ok(Json(CustomerCreated::new(customer_id)))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
