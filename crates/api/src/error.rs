//! HTTP rendering of application errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use tally_shared::AppError;

/// An [`AppError`] on its way out as an HTTP response.
///
/// Every failure renders as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with `message`.
    pub fn validation(message: impl ToString) -> Self {
        Self(AppError::Validation(message.to_string()))
    }

    /// 400 for a rule the request broke.
    pub fn business(message: impl ToString) -> Self {
        Self(AppError::BusinessRule(message.to_string()))
    }

    /// 400 for a name or key that is already taken.
    pub fn conflict(message: impl ToString) -> Self {
        Self(AppError::Conflict(message.to_string()))
    }

    /// 404 with `message`.
    pub fn not_found(message: impl ToString) -> Self {
        Self(AppError::NotFound(message.to_string()))
    }

    /// 500 with `message`.
    pub fn internal(message: impl ToString) -> Self {
        Self(AppError::Internal(message.to_string()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }
        (status, Json(self.0.body())).into_response()
    }
}
