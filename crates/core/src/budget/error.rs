//! Budget error types.

use tally_shared::types::{CategoryId, MonthParseError};
use thiserror::Error;

use crate::validation::AmountError;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Month key is not `YYYY-MM`.
    #[error(transparent)]
    InvalidMonth(#[from] MonthParseError),

    /// Override request without a category.
    #[error("Category is required")]
    CategoryRequired,

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Invalid budget amount.
    #[error(transparent)]
    Amount(#[from] AmountError),
}
