//! Input validation shared by every budgeting operation.
//!
//! Amounts arrive from forms and CSV files as numbers or numeric strings. They
//! are parsed leniently, rounded to cents and rejected when negative, not
//! numeric or above [`MAX_AMOUNT`].

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use thiserror::Error;

/// Largest amount accepted for a single transaction, budget or fund figure.
/// 1_000_000_000_000 (0xE8_D4A5_1000) split into its 32-bit words.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Amount validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amount is below zero.
    #[error("Amount cannot be negative")]
    Negative,

    /// Amount is not a number.
    #[error("Invalid amount format")]
    InvalidFormat,

    /// Amount is above [`MAX_AMOUNT`].
    #[error("Amount cannot exceed 1000000000000")]
    TooLarge,

    /// A total or ratio over stored amounts does not fit a decimal.
    #[error("Amount total is out of range")]
    OutOfRange,
}

/// Transaction date validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Date lies after today.
    #[error("Date cannot be in the future")]
    InFuture,

    /// Date is not `YYYY-MM-DD`.
    #[error("Invalid date format")]
    InvalidFormat,
}

/// Parses a decimal from text, accepting plain and scientific notation.
fn decimal_from_text(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Parses a non-negative amount from text, rounded half away from zero to cents.
///
/// # Errors
///
/// Returns `AmountError::InvalidFormat` for non-numeric text,
/// `AmountError::Negative` for values below zero and `AmountError::TooLarge`
/// above [`MAX_AMOUNT`].
pub fn parse_amount_str(text: &str) -> Result<Decimal, AmountError> {
    let amount = decimal_from_text(text).ok_or(AmountError::InvalidFormat)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative);
    }
    let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }
    Ok(amount.normalize())
}

/// Parses a non-negative amount from a JSON value (number or numeric string).
///
/// # Errors
///
/// Returns `AmountError::InvalidFormat` for anything that is not numeric and
/// `AmountError::Negative` for values below zero.
pub fn parse_amount(value: &Value) -> Result<Decimal, AmountError> {
    match value {
        Value::Number(number) => parse_amount_str(&number.to_string()),
        Value::String(text) => parse_amount_str(text),
        _ => Err(AmountError::InvalidFormat),
    }
}

/// Like [`parse_amount`], treating an absent field as zero.
///
/// # Errors
///
/// See [`parse_amount`].
pub fn parse_optional_amount(value: Option<&Value>) -> Result<Decimal, AmountError> {
    match value {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(value) => parse_amount(value),
    }
}

/// Whether a JSON field counts as "not provided" for required-field checks.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Parses a `YYYY-MM-DD` transaction date that must not be after `today`.
///
/// # Errors
///
/// Returns `DateError::InvalidFormat` when the text is not a calendar date and
/// `DateError::InFuture` when it lies after `today`.
pub fn parse_transaction_date(text: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let date = parse_iso_date(text)?;
    if date > today {
        return Err(DateError::InFuture);
    }
    Ok(date)
}

/// Parses a `YYYY-MM-DD` date without any range restriction.
///
/// # Errors
///
/// Returns `DateError::InvalidFormat` when the text is not a calendar date.
pub fn parse_iso_date(text: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| DateError::InvalidFormat)
}
