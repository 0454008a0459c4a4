//! Savings fund routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tally_core::fund::{FundError, FundInput, FundMovement, FundService};
use tally_db::repositories::{FundRepoError, FundRepository};
use tally_shared::types::FundId;
use tracing::info;

use super::{message, today};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
};

/// Creates the fund routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/funds", get(list_funds).post(create_fund))
        .route("/funds/refresh", post(refresh_funds))
        .route(
            "/funds/{id}",
            get(get_fund).put(update_fund).delete(delete_fund),
        )
        .route("/funds/{id}/contribute", post(contribute))
        .route("/funds/{id}/withdraw", post(withdraw))
}

pub(crate) fn map_fund_error(err: FundRepoError) -> ApiError {
    match err {
        FundRepoError::Fund(e @ FundError::NotFound(_)) => ApiError::not_found(e),
        FundRepoError::Fund(e @ FundError::DuplicateName) => ApiError::conflict(e),
        FundRepoError::Fund(e @ (FundError::InsufficientBalance | FundError::CategoryNotFound)) => {
            ApiError::business(e)
        }
        FundRepoError::Fund(e) => ApiError::validation(e),
        FundRepoError::Database(e) => e.into(),
    }
}

fn repo(state: &AppState) -> FundRepository {
    FundRepository::new((*state.db).clone())
}

/// GET `/funds` - Every fund with its progress figures.
async fn list_funds(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let funds = repo(&state).list_funds().await.map_err(map_fund_error)?;
    let today = today();
    let summaries = funds
        .iter()
        .map(|fund| FundService::summarize(fund, today))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::internal)?;
    Ok(Json(summaries))
}

/// GET `/funds/{id}` - One fund with its progress figures.
async fn get_fund(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let fund = repo(&state)
        .get_fund(FundId::new(id))
        .await
        .map_err(map_fund_error)?;
    let summary = FundService::summarize(&fund, today()).map_err(ApiError::internal)?;
    Ok(Json(summary))
}

/// POST `/funds` - Create a fund and its companion category.
async fn create_fund(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<FundInput>,
) -> Result<impl IntoResponse, ApiError> {
    let new_fund = FundService::validate_new(&input).map_err(ApiError::validation)?;
    let fund = repo(&state)
        .create_fund(new_fund)
        .await
        .map_err(map_fund_error)?;

    info!(fund_id = %fund.id, name = %fund.name, goal = %fund.goal, "Fund created via API");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Fund created successfully", "id": fund.id })),
    ))
}

/// PUT `/funds/{id}` - Update name, goal, goal date or monthly contribution.
async fn update_fund(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<FundInput>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = FundService::validate_patch(&input).map_err(ApiError::validation)?;
    repo(&state)
        .update_fund(FundId::new(id), patch)
        .await
        .map_err(map_fund_error)?;
    Ok(message("Fund updated successfully"))
}

/// DELETE `/funds/{id}` - Delete a fund, its category and its transactions.
async fn delete_fund(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .delete_fund(FundId::new(id))
        .await
        .map_err(map_fund_error)?;
    Ok(message("Fund deleted successfully"))
}

/// POST `/funds/{id}/contribute` - Add money to a fund.
async fn contribute(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(movement): ApiJson<FundMovement>,
) -> Result<impl IntoResponse, ApiError> {
    let amount = FundService::validate_movement(&movement).map_err(ApiError::validation)?;
    let new_balance = repo(&state)
        .contribute(FundId::new(id), amount, movement.notes, today())
        .await
        .map_err(map_fund_error)?;
    Ok(Json(json!({
        "message": "Contribution successful",
        "new_balance": new_balance,
    })))
}

/// POST `/funds/{id}/withdraw` - Take money out of a fund.
async fn withdraw(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(movement): ApiJson<FundMovement>,
) -> Result<impl IntoResponse, ApiError> {
    let amount = FundService::validate_movement(&movement).map_err(ApiError::validation)?;
    let new_balance = repo(&state)
        .withdraw(FundId::new(id), amount, movement.notes, today())
        .await
        .map_err(map_fund_error)?;
    Ok(Json(json!({
        "message": "Withdrawal successful",
        "new_balance": new_balance,
    })))
}

/// POST `/funds/refresh` - Recompute every balance from the ledger.
async fn refresh_funds(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let refreshed = repo(&state)
        .refresh_balances()
        .await
        .map_err(map_fund_error)?;
    Ok(Json(json!({
        "message": "Funds refreshed successfully",
        "refreshed": refreshed,
    })))
}
