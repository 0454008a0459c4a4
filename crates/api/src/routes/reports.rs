//! Report and cash flow graph routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::NaiveDate;
use serde::Deserialize;
use tally_core::ledger::TransactionRow;
use tally_core::reports::{ReportService, SankeyGraph, SankeyPeriod};
use tally_db::repositories::{FundRepository, TransactionRepository};

use super::{funds::map_fund_error, parse_month, today, transactions::map_transaction_error};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiPath, ApiQuery},
};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/monthly-summary/{month}", get(monthly_summary))
        .route("/reports/annual-overview/{year}", get(annual_overview))
        .route("/reports/category-analysis/{month}", get(category_analysis))
        .route("/reports/spending-trends", get(spending_trends))
        .route("/reports/period-comparison", get(period_comparison))
        .route("/reports/fund-progress", get(fund_progress))
        .route("/sankey-data/{period}", get(sankey_current))
        .route("/sankey-data/{period}/{key}", get(sankey_for_key))
}

/// `?start=YYYY-MM&end=YYYY-MM`.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    /// First month.
    pub start: Option<String>,
    /// Last month (inclusive).
    pub end: Option<String>,
}

/// Bounds of the two periods being compared.
#[derive(Debug, Default, Deserialize)]
pub struct ComparisonQuery {
    /// First period start.
    pub start1: Option<String>,
    /// First period end.
    pub end1: Option<String>,
    /// Second period start.
    pub start2: Option<String>,
    /// Second period end.
    pub end2: Option<String>,
}

async fn rows_between(
    state: &AppState,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<TransactionRow>, ApiError> {
    TransactionRepository::new((*state.db).clone())
        .list_between(start, end)
        .await
        .map_err(map_transaction_error)
}

/// GET `/reports/monthly-summary/{month}` - Totals and per-category breakdowns.
async fn monthly_summary(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let month = parse_month(&month)?;
    let (start, end) = month.date_range();
    let rows = rows_between(&state, start, end).await?;
    Ok(Json(ReportService::monthly_summary(month, &rows).map_err(ApiError::internal)?))
}

/// GET `/reports/annual-overview/{year}` - Month by month income and spending.
async fn annual_overview(
    State(state): State<AppState>,
    ApiPath(year): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let year = ReportService::parse_year(&year).map_err(ApiError::validation)?;
    let (start, end) = ReportService::year_range(year);
    let rows = rows_between(&state, start, end).await?;
    Ok(Json(ReportService::annual_overview(year, &rows, today()).map_err(ApiError::internal)?))
}

/// GET `/reports/category-analysis/{month}` - Spending share per group.
async fn category_analysis(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let month = parse_month(&month)?;
    let (start, end) = month.date_range();
    let rows = rows_between(&state, start, end).await?;
    Ok(Json(ReportService::category_analysis(month, &rows).map_err(ApiError::internal)?))
}

/// GET `/reports/spending-trends` - Monthly outflow over a range of months.
async fn spending_trends(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TrendQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (start, end) =
        ReportService::trend_range(query.start.as_deref(), query.end.as_deref(), today())
            .map_err(ApiError::validation)?;
    let rows = rows_between(&state, start.first_day(), end.next().first_day()).await?;
    Ok(Json(ReportService::spending_trends(start, end, &rows).map_err(ApiError::internal)?))
}

/// GET `/reports/period-comparison` - Outflow of two month ranges side by side.
async fn period_comparison(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ComparisonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bounds = ReportService::comparison_bounds([
        query.start1.as_deref(),
        query.end1.as_deref(),
        query.start2.as_deref(),
        query.end2.as_deref(),
    ])
    .map_err(ApiError::validation)?;
    let [start1, end1, start2, end2] = bounds;
    let rows = rows_between(
        &state,
        start1.min(start2).first_day(),
        end1.max(end2).next().first_day(),
    )
    .await?;
    Ok(Json(ReportService::period_comparison(bounds, &rows).map_err(ApiError::internal)?))
}

/// GET `/reports/fund-progress` - Progress of every fund.
async fn fund_progress(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let funds = FundRepository::new((*state.db).clone())
        .list_funds()
        .await
        .map_err(map_fund_error)?;
    Ok(Json(ReportService::fund_progress(&funds, today()).map_err(ApiError::internal)?))
}

async fn sankey(
    state: &AppState,
    period: &str,
    key: Option<&str>,
) -> Result<Json<SankeyGraph>, ApiError> {
    let period: SankeyPeriod = period.parse().map_err(ApiError::validation)?;
    let (start, end) = period.range(key, today()).map_err(ApiError::validation)?;
    let rows = rows_between(state, start, end).await?;
    Ok(Json(ReportService::sankey(&rows).map_err(ApiError::internal)?))
}

/// GET `/sankey-data/{period}` - Cash flow graph for the current month or year.
async fn sankey_current(
    State(state): State<AppState>,
    ApiPath(period): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    sankey(&state, &period, None).await
}

/// GET `/sankey-data/{period}/{key}` - Cash flow graph for a given month or year.
async fn sankey_for_key(
    State(state): State<AppState>,
    ApiPath((period, key)): ApiPath<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    sankey(&state, &period, Some(&key)).await
}
