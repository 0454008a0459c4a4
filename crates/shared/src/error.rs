//! Application-wide error types.

use serde_json::{Value, json};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown when a failure carries no usable description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Application error types.
///
/// Every variant carries the human readable message that ends up in the
/// `{"error": ...}` body of a failed API response.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g. withdrawing more than a fund holds).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    ///
    /// Validation, business rule and conflict failures all map to 400.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::BusinessRule(_) | Self::Conflict(_) => 400,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the bare message without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::BusinessRule(msg)
            | Self::Conflict(msg)
            | Self::Database(msg)
            | Self::Internal(msg) => {
                if msg.is_empty() {
                    UNKNOWN_ERROR
                } else {
                    msg
                }
            }
        }
    }

    /// Renders the JSON error body: `{"error": "<message>"}`.
    #[must_use]
    pub fn body(&self) -> Value {
        json!({ "error": self.message() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::NotFound("Fund not found: 9".into()), 404, "NOT_FOUND")]
    #[case(AppError::Validation("Invalid amount format".into()), 400, "VALIDATION_ERROR")]
    #[case(AppError::BusinessRule("Insufficient fund balance".into()), 400, "BUSINESS_RULE_VIOLATION")]
    #[case(AppError::Conflict("Group already exists".into()), 400, "CONFLICT")]
    #[case(AppError::Database("disk I/O error".into()), 500, "DATABASE_ERROR")]
    #[case(AppError::Internal("boom".into()), 500, "INTERNAL_ERROR")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_display_keeps_prefix_but_body_does_not() {
        let err = AppError::Validation("Amount cannot be negative".into());
        assert_eq!(err.to_string(), "Validation error: Amount cannot be negative");
        assert_eq!(err.body(), json!({ "error": "Amount cannot be negative" }));
    }

    #[test]
    fn test_empty_message_falls_back() {
        let err = AppError::Internal(String::new());
        assert_eq!(err.message(), UNKNOWN_ERROR);
        assert_eq!(err.body()["error"], "Unknown error");
    }
}
