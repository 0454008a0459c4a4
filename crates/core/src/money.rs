//! Checked arithmetic for money figures.
//!
//! Totals, differences and ratios over stored amounts go through these helpers.
//! Any overflow surfaces as [`AmountError::OutOfRange`].

use rust_decimal::Decimal;

use crate::validation::AmountError;

/// `a + b`.
///
/// # Errors
///
/// Returns `AmountError::OutOfRange` on overflow.
pub fn add(a: Decimal, b: Decimal) -> Result<Decimal, AmountError> {
    a.checked_add(b).ok_or(AmountError::OutOfRange)
}

/// `a - b`.
///
/// # Errors
///
/// Returns `AmountError::OutOfRange` on overflow.
pub fn sub(a: Decimal, b: Decimal) -> Result<Decimal, AmountError> {
    a.checked_sub(b).ok_or(AmountError::OutOfRange)
}

/// Sum of `values`, zero when empty.
///
/// # Errors
///
/// Returns `AmountError::OutOfRange` on overflow.
pub fn total<I>(values: I) -> Result<Decimal, AmountError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add)
}

/// `part / whole * 100` rounded to cents, or zero when `whole` is not positive.
///
/// # Errors
///
/// Returns `AmountError::OutOfRange` on overflow.
pub fn percent(part: Decimal, whole: Decimal) -> Result<Decimal, AmountError> {
    if whole <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|value| value.round_dp(2))
        .ok_or(AmountError::OutOfRange)
}

/// `value / count` rounded to cents.
///
/// # Errors
///
/// Returns `AmountError::OutOfRange` on overflow or a zero count.
pub fn divide(value: Decimal, count: Decimal) -> Result<Decimal, AmountError> {
    value
        .checked_div(count)
        .map(|quotient| quotient.round_dp(2))
        .ok_or(AmountError::OutOfRange)
}
