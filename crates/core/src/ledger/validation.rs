//! Validation of submitted transaction fields.
//!
//! Checks run in a fixed order so the first failing rule decides the message:
//! required fields, then amount, then date, then the category lookup.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tally_shared::types::CategoryId;

use super::error::TransactionError;
use super::types::{TransactionDraft, TransactionInput, TransactionPatch, TransactionType};
use crate::validation::{is_blank, parse_amount, parse_transaction_date};

/// Reads a category ID from a number or a numeric string.
fn parse_category_id(value: &Value) -> Result<CategoryId, TransactionError> {
    let raw = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    raw.and_then(|id| i32::try_from(id).ok())
        .map(CategoryId::new)
        .ok_or(TransactionError::InvalidCategory)
}

fn blank_str(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// A JSON number equal to zero. Numeric strings such as `"0"` do not count.
fn is_zero_number(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(number)) => {
            Decimal::from_str(&number.to_string()).is_ok_and(|amount| amount.is_zero())
        }
        _ => false,
    }
}

/// Validates a new transaction.
///
/// `category_exists` reports whether a category ID refers to a stored category.
///
/// # Errors
///
/// Returns the first failing rule as a `TransactionError`.
pub fn validate_new<F>(
    input: &TransactionInput,
    today: NaiveDate,
    category_exists: F,
) -> Result<TransactionDraft, TransactionError>
where
    F: Fn(CategoryId) -> bool,
{
    if is_blank(input.amount.as_ref()) || is_zero_number(input.amount.as_ref()) {
        return Err(TransactionError::AmountRequired);
    }
    if blank_str(input.transaction_type.as_deref()) {
        return Err(TransactionError::TypeRequired);
    }
    if is_blank(input.category_id.as_ref()) {
        return Err(TransactionError::CategoryRequired);
    }
    let Some(date) = input.date.as_deref().filter(|d| !d.trim().is_empty()) else {
        return Err(TransactionError::DateRequired);
    };

    let amount = parse_amount(input.amount.as_ref().unwrap_or(&Value::Null))?;
    let date = parse_transaction_date(date, today)?;
    let transaction_type: TransactionType =
        input.transaction_type.as_deref().unwrap_or_default().parse()?;
    let category_id = parse_category_id(input.category_id.as_ref().unwrap_or(&Value::Null))?;
    if !category_exists(category_id) {
        return Err(TransactionError::InvalidCategory);
    }

    Ok(TransactionDraft {
        date,
        transaction_type,
        amount,
        category_id,
        description: input.description.clone().unwrap_or_default(),
        merchant: input.merchant.clone().unwrap_or_default(),
        notes: input.notes.clone().unwrap_or_default(),
    })
}

/// Validates a partial update; only supplied fields are checked.
///
/// # Errors
///
/// Returns the first failing rule as a `TransactionError`.
pub fn validate_patch<F>(
    input: &TransactionInput,
    today: NaiveDate,
    category_exists: F,
) -> Result<TransactionPatch, TransactionError>
where
    F: Fn(CategoryId) -> bool,
{
    let amount = input.amount.as_ref().map(parse_amount).transpose()?;
    let date = input
        .date
        .as_deref()
        .map(|d| parse_transaction_date(d, today))
        .transpose()?;
    let transaction_type = input
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()?;
    let category_id = input.category_id.as_ref().map(parse_category_id).transpose()?;
    if let Some(id) = category_id
        && !category_exists(id)
    {
        return Err(TransactionError::InvalidCategory);
    }

    Ok(TransactionPatch {
        date,
        transaction_type,
        amount,
        category_id,
        description: input.description.clone(),
        merchant: input.merchant.clone(),
        notes: input.notes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{AmountError, DateError};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn input(value: Value) -> TransactionInput {
        serde_json::from_value(value).unwrap()
    }

    fn known(id: CategoryId) -> bool {
        id == CategoryId::new(1)
    }

    #[test]
    fn test_valid_transaction() {
        let draft = validate_new(
            &input(json!({
                "amount": "42.10",
                "transaction_type": "expense",
                "category_id": 1,
                "date": "2024-03-10",
                "merchant": "KROGER"
            })),
            today(),
            known,
        )
        .unwrap();
        assert_eq!(draft.amount, dec!(42.10));
        assert_eq!(draft.transaction_type, TransactionType::Expense);
        assert_eq!(draft.merchant, "KROGER");
        assert_eq!(draft.description, "");
    }

    #[test]
    fn test_required_fields_in_order() {
        let cases = [
            (json!({}), "Amount is required"),
            (json!({"amount": 5}), "Transaction type is required"),
            (json!({"amount": 5, "type": "expense"}), "Category is required"),
            (
                json!({"amount": 5, "type": "expense", "category_id": "1"}),
                "Date is required",
            ),
        ];
        for (body, message) in cases {
            let err = validate_new(&input(body), today(), known).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_numeric_zero_counts_as_missing_amount() {
        let body = |amount: Value| {
            input(json!({
                "amount": amount,
                "transaction_type": "expense",
                "category_id": 1,
                "date": "2024-03-10"
            }))
        };
        for amount in [json!(0), json!(0.0)] {
            assert_eq!(
                validate_new(&body(amount), today(), known).unwrap_err(),
                TransactionError::AmountRequired
            );
        }
        assert_eq!(validate_new(&body(json!("0")), today(), known).unwrap().amount, dec!(0));
        assert_eq!(
            validate_new(&body(json!(1e13)), today(), known).unwrap_err(),
            TransactionError::Amount(AmountError::TooLarge)
        );

        let patch = validate_patch(&input(json!({"amount": 0})), today(), known).unwrap();
        assert_eq!(patch.amount, Some(dec!(0)));
    }

    #[test]
    fn test_amount_checked_before_date_and_category() {
        let err = validate_new(
            &input(json!({
                "amount": -3,
                "transaction_type": "expense",
                "category_id": 99,
                "date": "2099-01-01"
            })),
            today(),
            known,
        )
        .unwrap_err();
        assert_eq!(err, TransactionError::Amount(AmountError::Negative));
    }

    #[test]
    fn test_future_date_and_unknown_category() {
        let future = validate_new(
            &input(json!({
                "amount": 3,
                "transaction_type": "expense",
                "category_id": 1,
                "date": "2024-03-16"
            })),
            today(),
            known,
        )
        .unwrap_err();
        assert_eq!(future, TransactionError::Date(DateError::InFuture));

        let unknown = validate_new(
            &input(json!({
                "amount": 3,
                "transaction_type": "expense",
                "category_id": 2,
                "date": "2024-03-01"
            })),
            today(),
            known,
        )
        .unwrap_err();
        assert_eq!(unknown.to_string(), "Invalid category");
    }

    #[test]
    fn test_patch_checks_only_supplied_fields() {
        let patch = validate_patch(&input(json!({"notes": "split"})), today(), known).unwrap();
        assert_eq!(patch.notes.as_deref(), Some("split"));
        assert!(patch.amount.is_none());

        let err = validate_patch(&input(json!({"amount": "abc"})), today(), known).unwrap_err();
        assert_eq!(err.to_string(), "Invalid amount format");
    }
}
