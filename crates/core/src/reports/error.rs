//! Report error types.

use tally_shared::types::MonthParseError;
use thiserror::Error;

use crate::validation::AmountError;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Month key is not `YYYY-MM`.
    #[error(transparent)]
    InvalidMonth(#[from] MonthParseError),

    /// Year is not a four digit number.
    #[error("Invalid year: {0}")]
    InvalidYear(String),

    /// Flow graph period is neither `monthly` nor `annual`.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Period comparison called without all four bounds.
    #[error("Missing date range parameters")]
    MissingDateRange,

    /// A report total does not fit a decimal.
    #[error(transparent)]
    Amount(#[from] AmountError),
}
