//! Fund error types.

use tally_shared::types::FundId;
use thiserror::Error;

use crate::validation::{AmountError, DateError};

/// Savings fund errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FundError {
    /// Fund name missing or blank.
    #[error("Fund name is required")]
    NameRequired,

    /// Another fund already uses this name.
    #[error("Fund with this name already exists")]
    DuplicateName,

    /// A named amount field failed validation.
    #[error("{field}: {source}")]
    InvalidField {
        /// Field label, e.g. `Goal amount`.
        field: &'static str,
        /// Underlying amount failure.
        source: AmountError,
    },

    /// Goal date is not a `YYYY-MM-DD` date.
    #[error(transparent)]
    GoalDate(#[from] DateError),

    /// Contribution or withdrawal amount is invalid.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Withdrawal larger than the balance.
    #[error("Insufficient fund balance")]
    InsufficientBalance,

    /// Companion fund category is missing.
    #[error("Fund category not found")]
    CategoryNotFound,

    /// Fund not found.
    #[error("Fund not found: {0}")]
    NotFound(FundId),
}
