//! Transaction ledger routes.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tally_core::fund::FundError;
use tally_core::ledger::{self, TransactionError, TransactionFilter, TransactionInput};
use tally_db::repositories::{CategoryRepository, TransactionRepoError, TransactionRepository};
use tally_shared::types::{CategoryId, TransactionId};
use tracing::info;

use super::{message, today};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// Ledger filter as query parameters; blank values match everything.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// `YYYY-MM`.
    pub month: Option<String>,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Category ID.
    pub category: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
}

pub(crate) fn map_transaction_error(err: TransactionRepoError) -> ApiError {
    match err {
        TransactionRepoError::Transaction(e @ TransactionError::NotFound(_)) => {
            ApiError::not_found(e)
        }
        TransactionRepoError::Transaction(
            e @ TransactionError::Fund(FundError::InsufficientBalance),
        ) => ApiError::business(e),
        TransactionRepoError::Transaction(e) => ApiError::validation(e),
        TransactionRepoError::Database(e) => e.into(),
    }
}

fn repo(state: &AppState) -> TransactionRepository {
    TransactionRepository::new((*state.db).clone())
}

async fn known_categories(state: &AppState) -> Result<HashSet<CategoryId>, ApiError> {
    CategoryRepository::new((*state.db).clone())
        .category_ids()
        .await
        .map_err(ApiError::internal)
}

/// GET `/transactions` - Filtered ledger, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = TransactionFilter::from_params(
        query.month.as_deref(),
        query.transaction_type.as_deref(),
        query.category.as_deref(),
        query.search.as_deref(),
    )
    .map_err(ApiError::validation)?;
    let rows = repo(&state)
        .list_transactions(&filter)
        .await
        .map_err(map_transaction_error)?;
    Ok(Json(rows))
}

/// GET `/transactions/{id}` - One transaction with its category.
async fn get_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = repo(&state)
        .get_transaction(TransactionId::new(id))
        .await
        .map_err(map_transaction_error)?;
    Ok(Json(row))
}

/// POST `/transactions` - Book a transaction.
///
/// A transaction in a fund category moves that fund's balance.
async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let known = known_categories(&state).await?;
    let draft = ledger::validate_new(&input, today(), |id| known.contains(&id))
        .map_err(ApiError::validation)?;

    let row = repo(&state)
        .create_transaction(draft)
        .await
        .map_err(map_transaction_error)?;

    info!(transaction_id = %row.id, tx_type = row.transaction_type.as_str(), amount = %row.amount, "Transaction booked");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaction added successfully",
            "id": row.id,
            "transaction": row,
        })),
    ))
}

/// PUT `/transactions/{id}` - Update the supplied fields.
async fn update_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let known = known_categories(&state).await?;
    let patch = ledger::validate_patch(&input, today(), |id| known.contains(&id))
        .map_err(ApiError::validation)?;

    let row = repo(&state)
        .update_transaction(TransactionId::new(id), patch)
        .await
        .map_err(map_transaction_error)?;
    Ok(Json(json!({
        "message": "Transaction updated successfully",
        "transaction": row,
    })))
}

/// DELETE `/transactions/{id}` - Delete a transaction, reverting any fund effect.
async fn delete_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .delete_transaction(TransactionId::new(id))
        .await
        .map_err(map_transaction_error)?;
    Ok(message("Transaction deleted"))
}
