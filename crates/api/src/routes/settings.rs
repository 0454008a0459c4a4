//! Persisted UI settings.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Deserialize;
use serde_json::json;
use tally_db::repositories::SettingsRepository;
use tally_shared::YearMonth;

use super::{message, parse_month, today};
use crate::{AppState, error::ApiError, extractors::ApiJson};

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/settings/selected-month",
        get(get_selected_month).put(set_selected_month),
    )
}

/// Body of `PUT /settings/selected-month`.
#[derive(Debug, Default, Deserialize)]
pub struct SelectedMonthRequest {
    /// `YYYY-MM`.
    pub month: Option<String>,
}

/// GET `/settings/selected-month` - The saved month, or the current one.
async fn get_selected_month(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let month = SettingsRepository::new((*state.db).clone())
        .selected_month()
        .await?
        .unwrap_or_else(|| YearMonth::from_date(today()));
    Ok(Json(json!({ "month": month })))
}

/// PUT `/settings/selected-month` - Save the month the views open on.
async fn set_selected_month(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SelectedMonthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let month = parse_month(payload.month.as_deref().unwrap_or_default())?;
    SettingsRepository::new((*state.db).clone())
        .set_selected_month(month)
        .await?;
    Ok(message("Selected month saved"))
}
