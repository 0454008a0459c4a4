//! CSV and JSON export routes.

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::Local;
use tally_core::export::ExportService;
use tally_db::repositories::{
    BudgetRepository, CategoryRepository, FundRepository, TransactionRepository,
};
use tracing::info;

use super::{funds::map_fund_error, today, transactions::map_transaction_error};
use crate::{AppState, error::ApiError};

/// Creates the export routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/export/csv", get(export_csv))
        .route("/export/json", get(export_json))
}

fn attachment(filename: &str) -> String {
    format!("attachment; filename={filename}")
}

/// GET `/export/csv` - Every transaction as a CSV download, newest first.
async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = TransactionRepository::new((*state.db).clone())
        .list_all()
        .await
        .map_err(map_transaction_error)?;
    let body = ExportService::transactions_csv(&rows).map_err(ApiError::internal)?;

    info!(rows = rows.len(), "Transactions exported as CSV");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment(&ExportService::csv_filename(today())),
            ),
        ],
        body,
    ))
}

/// GET `/export/json` - Categories, transactions, funds and overrides as one JSON download.
async fn export_json(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let categories = CategoryRepository::new((*state.db).clone())
        .list_categories(None)
        .await
        .map_err(ApiError::internal)?;
    let transactions = TransactionRepository::new((*state.db).clone())
        .list_all()
        .await
        .map_err(map_transaction_error)?;
    let funds = FundRepository::new((*state.db).clone())
        .list_funds()
        .await
        .map_err(map_fund_error)?;
    let budgets = BudgetRepository::new((*state.db).clone())
        .list_overrides()
        .await
        .map_err(ApiError::internal)?;

    let bundle = ExportService::bundle(
        Local::now().naive_local(),
        &categories,
        &transactions,
        &funds,
        budgets,
    );
    let body = ExportService::bundle_json(&bundle).map_err(ApiError::internal)?;

    info!(
        categories = categories.len(),
        transactions = transactions.len(),
        funds = funds.len(),
        "Data exported as JSON"
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment(&ExportService::json_filename(today())),
            ),
        ],
        body,
    ))
}
