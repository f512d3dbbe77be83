//! Report route handlers.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::{ApiQuery, DataResponse};
use crate::db::ReportRepository;
use crate::error::{AppError, Result};
use crate::models::{CustomerSpend, DailySales, DateRange, ProductSales};
use crate::state::AppState;

/// Query parameters for the sales report.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SalesQuery {
    /// Parse the optional `YYYY-MM-DD` bounds. Empty values count as absent.
    fn date_range(&self) -> Result<DateRange> {
        Ok(DateRange {
            start: parse_date("start_date", self.start_date.as_deref())?,
            end: parse_date("end_date", self.end_date.as_deref())?,
        })
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{field} must be YYYY-MM-DD"))),
    }
}

/// Daily sales, newest date first.
#[tracing::instrument(skip(state))]
pub async fn sales(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SalesQuery>,
) -> Result<Json<DataResponse<Vec<DailySales>>>> {
    let range = query.date_range()?;
    let report = ReportRepository::new(state.pool()).sales(range).await?;
    Ok(Json(DataResponse::new(report)))
}

/// Product sales, highest revenue first.
#[tracing::instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<ProductSales>>>> {
    let report = ReportRepository::new(state.pool()).product_sales().await?;
    Ok(Json(DataResponse::new(report)))
}

/// Customer spend, biggest spender first.
#[tracing::instrument(skip(state))]
pub async fn customers(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<CustomerSpend>>>> {
    let report = ReportRepository::new(state.pool()).customers().await?;
    Ok(Json(DataResponse::new(report)))
}
