//! Bank statement import and keyword mapping routes.

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tally_core::import::{
    ImportError, decode_upload, plan_import, read_statement, validate_keyword, validate_upload,
};
use tally_db::repositories::{KeywordRepository, TransactionRepository};
use tracing::info;

use super::{message, today, transactions::map_transaction_error};
use crate::{AppState, error::ApiError, extractors::ApiJson};

/// Multipart field carrying the statement.
const FILE_FIELD: &str = "file";

/// Creates the import routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/import-csv", post(import_csv))
        .route("/category-keywords", post(add_keyword))
}

/// Body of a keyword mapping request.
#[derive(Debug, Default, Deserialize)]
pub struct KeywordRequest {
    /// Merchant keyword (matched case-insensitively).
    pub keyword: Option<String>,
    /// Category name it maps to.
    pub category: Option<String>,
}

/// POST `/import-csv` - Import a `.csv` bank statement.
///
/// Rows are categorized by merchant keyword; unknown merchants land in
/// "Uncategorized" and are reported back.
async fn import_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::validation(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        upload = Some((filename, bytes));
        break;
    }

    validate_upload(upload.as_ref().map(|(name, _)| name.as_str()))
        .map_err(ApiError::validation)?;
    let Some((filename, bytes)) = upload else {
        return Err(ApiError::validation(ImportError::NoFile));
    };

    let text = decode_upload(&bytes).map_err(ApiError::validation)?;
    let rows = read_statement(text, today()).map_err(ApiError::validation)?;
    let categorizer = KeywordRepository::new((*state.db).clone())
        .categorizer()
        .await?;
    let plan = plan_import(&rows, &categorizer);

    let imported = TransactionRepository::new((*state.db).clone())
        .import_plan(&plan)
        .await
        .map_err(map_transaction_error)?;

    info!(
        file = %filename,
        imported,
        skipped = plan.skipped,
        unknown = plan.unknown_merchants.len(),
        "Statement imported"
    );
    Ok(Json(json!({
        "message": format!("Imported {imported} transactions"),
        "imported": imported,
        "skipped": plan.skipped,
        "unknown_merchants": plan.unknown_merchants,
    })))
}

/// POST `/category-keywords` - Map a merchant keyword to a category.
async fn add_keyword(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<KeywordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (keyword, category) =
        validate_keyword(payload.keyword.as_deref(), payload.category.as_deref())
            .map_err(ApiError::validation)?;
    KeywordRepository::new((*state.db).clone())
        .add_keyword(&keyword, &category)
        .await?;
    Ok(message("Keyword added"))
}
