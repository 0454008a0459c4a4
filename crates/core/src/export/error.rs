//! Export error types.

use thiserror::Error;

/// Errors raised while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Writer output was not UTF-8.
    #[error("Export produced invalid UTF-8")]
    Encoding,
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for ExportError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        Self::Csv(csv::Error::from(err.into_error()))
    }
}
