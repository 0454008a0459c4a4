//! API route definitions.

use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde_json::{Value, json};
use tally_shared::YearMonth;

use crate::{AppState, error::ApiError};

pub mod budget;
pub mod categories;
pub mod dashboard;
pub mod export;
pub mod funds;
pub mod health;
pub mod import;
pub mod reports;
pub mod settings;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(categories::routes())
        .merge(budget::routes())
        .merge(transactions::routes())
        .merge(funds::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .merge(import::routes())
        .merge(export::routes())
        .merge(settings::routes())
}

/// Local calendar date used for "today" rules (future dates, fund movements).
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `{"message": ...}` body of a successful mutation.
pub(crate) fn message(text: impl Into<String>) -> Json<Value> {
    Json(json!({ "message": text.into() }))
}

/// Parses a `YYYY-MM` path segment.
pub(crate) fn parse_month(raw: &str) -> Result<YearMonth, ApiError> {
    raw.parse().map_err(ApiError::validation)
}
