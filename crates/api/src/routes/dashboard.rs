//! Dashboard routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use tally_core::dashboard::{DashboardService, RECENT_LIMIT};
use tally_core::reports::ReportService;
use tally_db::repositories::{FundRepository, TransactionRepository};

use super::{funds::map_fund_error, parse_month, today, transactions::map_transaction_error};
use crate::{AppState, error::ApiError, extractors::ApiPath};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard-data/{month}", get(monthly_dashboard))
        .route("/dashboard-data/annual/{year}", get(annual_dashboard))
}

/// GET `/dashboard-data/{month}` - Totals, funds and recent activity for a month.
async fn monthly_dashboard(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let month = parse_month(&month)?;
    let (start, end) = month.date_range();

    let transactions = TransactionRepository::new((*state.db).clone());
    let rows = transactions
        .list_between(start, end)
        .await
        .map_err(map_transaction_error)?;
    let recent = transactions
        .recent(RECENT_LIMIT)
        .await
        .map_err(map_transaction_error)?;
    let funds = FundRepository::new((*state.db).clone())
        .list_funds()
        .await
        .map_err(map_fund_error)?;

    let data = DashboardService::monthly(
        month,
        &rows,
        &funds,
        recent,
        today(),
    )
    .map_err(ApiError::internal)?;
    Ok(Json(data))
}

/// GET `/dashboard-data/annual/{year}` - The same figures for a whole year.
async fn annual_dashboard(
    State(state): State<AppState>,
    ApiPath(year): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let year = ReportService::parse_year(&year).map_err(ApiError::validation)?;
    let (start, end) = ReportService::year_range(year);

    let transactions = TransactionRepository::new((*state.db).clone());
    let rows = transactions
        .list_between(start, end)
        .await
        .map_err(map_transaction_error)?;
    let recent = transactions
        .recent(RECENT_LIMIT)
        .await
        .map_err(map_transaction_error)?;
    let funds = FundRepository::new((*state.db).clone())
        .list_funds()
        .await
        .map_err(map_fund_error)?;

    let data = DashboardService::annual(
        year,
        &rows,
        &funds,
        recent,
        today(),
    )
    .map_err(ApiError::internal)?;
    Ok(Json(data))
}
