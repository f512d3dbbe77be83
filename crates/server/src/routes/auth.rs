//! Member authentication route handlers.

use axum::{Json, extract::State};

use crate::api::{ApiJson, DataResponse};
use crate::error::Result;
use crate::models::{MemberProfile, MemberSummary};
use crate::services::auth::{Login, MemberAuthService, Registration};
use crate::state::AppState;

/// Register a member.
#[tracing::instrument(skip(state, registration))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(registration): ApiJson<Registration>,
) -> Result<Json<DataResponse<MemberSummary>>> {
    let summary = MemberAuthService::new(state.pool())
        .register(registration)
        .await?;
    Ok(Json(DataResponse::new(summary)))
}

/// Log a member in and return their profile.
#[tracing::instrument(skip(state, login))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(login): ApiJson<Login>,
) -> Result<Json<DataResponse<MemberProfile>>> {
    let profile = MemberAuthService::new(state.pool()).login(login).await?;

    tracing::info!(customer_id = %profile.customer_id, "Member logged in");
    Ok(Json(DataResponse::new(profile)))
}
