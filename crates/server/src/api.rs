//! JSON envelope types and request extractors shared by the API routes.
//!
//! Successful responses look like `{"success": true, "data": ...}`, or carry
//! the new id directly for creation endpoints.

use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::header,
};
use serde::{Serialize, de::DeserializeOwned};

use brewdesk_core::{CustomerId, OrderId};

use crate::error::AppError;

/// `axum::Json` whose rejections become a 400 failure envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` whose rejections become a 400 failure envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `axum::extract::Path` whose rejections become a 400 failure envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// A body sent either as JSON or as an urlencoded form, chosen by
/// `Content-Type`. Anything that is not a form is parsed as JSON.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(Self(value))
        }
    }
}

/// `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{"success": true, "message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Response to `POST /api/orders`.
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub success: bool,
    pub order_id: OrderId,
}

impl OrderCreated {
    pub const fn new(order_id: OrderId) -> Self {
        Self {
            success: true,
            order_id,
        }
    }
}

/// Response to `POST /api/customers`.
#[derive(Debug, Serialize)]
pub struct CustomerCreated {
    pub success: bool,
    pub customer_id: CustomerId,
}

impl CustomerCreated {
    pub const fn new(customer_id: CustomerId) -> Self {
        Self {
            success: true,
            customer_id,
        }
    }
}
