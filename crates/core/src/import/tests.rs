//! Property-based tests for statement import.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::*;
use crate::ledger::TransactionType;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

fn merchant_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("WALMART".to_string()),
        Just("SHELL OIL".to_string()),
        Just("CORNER BAKERY".to_string()),
        Just("NEIGHBORHOOD CAFE".to_string()),
        Just("NETFLIX".to_string()),
    ]
}

fn row_strategy() -> impl Strategy<Value = (String, u32, u32, i64)> {
    (merchant_strategy(), 1u32..=12, 1u32..=28, -100_000i64..100_000)
}

proptest! {
    #[test]
    fn prop_planned_amounts_are_absolute_and_typed_by_sign(
        rows in prop::collection::vec(row_strategy(), 1..20)
    ) {
        let text: String = rows
            .iter()
            .map(|(merchant, month, day, cents)| {
                format!("{merchant} {month:02}/{day:02},{}\n", Decimal::new(*cents, 2))
            })
            .collect();

        let parsed = read_statement(&text, today()).unwrap();
        prop_assert_eq!(parsed.len(), rows.len());

        let plan = plan_import(&parsed, &KeywordCategorizer::with_defaults());
        prop_assert_eq!(plan.transactions.len() + plan.skipped, rows.len());

        for (tx, (_, _, _, cents)) in plan.transactions.iter().zip(&rows) {
            prop_assert!(tx.amount >= Decimal::ZERO);
            prop_assert_eq!(tx.amount, Decimal::new(cents.abs(), 2));
            let expected = if *cents < 0 { TransactionType::Expense } else { TransactionType::Income };
            prop_assert_eq!(tx.transaction_type, expected);
        }
    }

    #[test]
    fn prop_unknown_merchants_are_distinct_and_uncategorized(
        merchants in prop::collection::vec(merchant_strategy(), 0..30)
    ) {
        let categorizer = KeywordCategorizer::with_defaults();
        let rows: Vec<StatementRow> = merchants
            .iter()
            .enumerate()
            .map(|(i, m)| StatementRow {
                row: i + 1,
                raw: m.clone(),
                parsed: parse_description(m),
                date: Some(today()),
                amount: Decimal::NEGATIVE_ONE,
            })
            .collect();
        let plan = plan_import(&rows, &categorizer);

        let mut seen = std::collections::HashSet::new();
        for merchant in &plan.unknown_merchants {
            prop_assert!(seen.insert(merchant.clone()));
            prop_assert!(categorizer.categorize(merchant).is_none());
        }
        for tx in &plan.transactions {
            let known = categorizer.categorize(&tx.merchant).is_some();
            prop_assert_eq!(tx.category == UNCATEGORIZED, !known);
        }
    }
}
