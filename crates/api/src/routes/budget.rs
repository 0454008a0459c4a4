//! Monthly budget routes.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use tally_core::budget::BudgetError;
use tally_core::validation::{AmountError, is_blank, parse_amount};
use tally_db::repositories::{BudgetRepoError, BudgetRepository};
use tally_shared::types::CategoryId;
use tracing::info;

use super::{message, parse_month};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budget/{month}", get(get_month_budget))
        .route("/budget/{month}/update", post(update_month_budget))
        .route("/budget-comparison/{month}", get(get_comparison))
}

/// Body of a per-month override.
#[derive(Debug, Default, Deserialize)]
pub struct OverrideRequest {
    /// Category ID, as a number or numeric string.
    pub category_id: Option<Value>,
    /// Budget for the month.
    pub amount: Option<Value>,
}

fn map_budget_error(err: BudgetRepoError) -> ApiError {
    match err {
        BudgetRepoError::Budget(e @ BudgetError::CategoryNotFound(_)) => ApiError::not_found(e),
        BudgetRepoError::Budget(e @ BudgetError::Amount(AmountError::OutOfRange)) => {
            ApiError::internal(e)
        }
        BudgetRepoError::Budget(e) => ApiError::validation(e),
        BudgetRepoError::Database(e) => e.into(),
    }
}

fn parse_category_id(value: Option<&Value>) -> Result<CategoryId, BudgetError> {
    if is_blank(value) {
        return Err(BudgetError::CategoryRequired);
    }
    let raw = match value {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    };
    raw.and_then(|id| i32::try_from(id).ok())
        .map(CategoryId::new)
        .ok_or(BudgetError::CategoryRequired)
}

/// GET `/budget/{month}` - Categories with the budget in effect for the month.
async fn get_month_budget(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let month = parse_month(&month)?;
    let categories = BudgetRepository::new((*state.db).clone())
        .monthly_categories(month)
        .await
        .map_err(map_budget_error)?;
    Ok(Json(categories))
}

/// GET `/budget-comparison/{month}` - Budget vs actual per category.
async fn get_comparison(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let month = parse_month(&month)?;
    let entries = BudgetRepository::new((*state.db).clone())
        .comparison(month)
        .await
        .map_err(map_budget_error)?;
    Ok(Json(entries))
}

/// POST `/budget/{month}/update` - Override one category's budget for the month.
///
/// The category's default budget is left untouched.
async fn update_month_budget(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
    ApiJson(payload): ApiJson<OverrideRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let month = parse_month(&month)?;
    let category_id =
        parse_category_id(payload.category_id.as_ref()).map_err(ApiError::validation)?;
    let amount = parse_amount(payload.amount.as_ref().unwrap_or(&Value::Null))
        .map_err(|e| ApiError::validation(BudgetError::from(e)))?;

    BudgetRepository::new((*state.db).clone())
        .set_month_override(month, category_id, amount)
        .await
        .map_err(map_budget_error)?;

    info!(%month, %category_id, %amount, "Month budget overridden");
    Ok(message("Budget updated for this month"))
}
