//! Transaction error types.

use tally_shared::types::{MonthParseError, TransactionId};
use thiserror::Error;

use crate::fund::FundError;
use crate::validation::{AmountError, DateError};

/// Errors that can occur while validating or applying ledger transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    // ========== Required Fields ==========
    /// Amount missing.
    #[error("Amount is required")]
    AmountRequired,

    /// Transaction type missing.
    #[error("Transaction type is required")]
    TypeRequired,

    /// Category missing.
    #[error("Category is required")]
    CategoryRequired,

    /// Date missing.
    #[error("Date is required")]
    DateRequired,

    // ========== Field Validation ==========
    /// Unknown transaction type.
    #[error("Invalid transaction type: {0}")]
    InvalidType(String),

    /// Category does not exist or is not an integer ID.
    #[error("Invalid category")]
    InvalidCategory,

    /// Invalid amount.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Invalid date.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Invalid month filter.
    #[error(transparent)]
    InvalidMonth(#[from] MonthParseError),

    // ========== State ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// Fund balance rule violated.
    #[error(transparent)]
    Fund(#[from] FundError),
}
