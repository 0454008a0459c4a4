//! Property-based tests for the summary calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::CategoryId;

use super::service::{IncomeTargetLatch, SummaryService};
use crate::budget::{BudgetService, ComparisonEntry, MonthlyCategory};
use crate::category::CategoryKind;
use crate::validation::{AmountError, MAX_AMOUNT};

fn entry(id: i32, kind: CategoryKind, budget: Decimal, actual: Decimal) -> ComparisonEntry {
    let category = MonthlyCategory {
        id: CategoryId::new(id),
        name: format!("Category {id}"),
        kind,
        parent_category: None,
        sort_order: 0,
        default_budget: budget,
        monthly_budget: budget,
        is_override: false,
    };
    BudgetService::compare(&category, actual).unwrap()
}

fn entries_strategy() -> impl Strategy<Value = Vec<ComparisonEntry>> {
    prop::collection::vec(
        (
            prop::sample::select(CategoryKind::ALL.to_vec()),
            0i64..=100_000_000_000_000,
            0i64..=100_000_000_000_000,
        ),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (kind, budget, actual))| {
                entry(
                    i32::try_from(i).unwrap_or(i32::MAX),
                    kind,
                    Decimal::new(budget, 2),
                    Decimal::new(actual, 2),
                )
            })
            .collect()
    })
}

#[test]
fn test_largest_amounts_in_every_bucket() {
    let entries: Vec<_> = CategoryKind::ALL
        .into_iter()
        .zip(1..)
        .map(|(kind, id)| entry(id, kind, MAX_AMOUNT, MAX_AMOUNT))
        .collect();
    let summary = SummaryService::summarize(&entries).unwrap();
    assert_eq!(summary.total_actual_outflow, MAX_AMOUNT * Decimal::from(3));
    assert_eq!(summary.money_to_budget, MAX_AMOUNT * Decimal::from(-2));
    assert_eq!(summary.expense_percent, Decimal::ONE_HUNDRED);
}

#[test]
fn test_bucket_overflow_is_an_error() {
    let entries = vec![
        entry(1, CategoryKind::Expense, Decimal::ZERO, Decimal::MAX),
        entry(2, CategoryKind::Expense, Decimal::ZERO, Decimal::MAX),
    ];
    assert_eq!(
        SummaryService::summarize(&entries).unwrap_err(),
        AmountError::OutOfRange
    );
}

proptest! {
    /// Money to budget is income minus every actual outflow.
    #[test]
    fn test_money_to_budget_identity(entries in entries_strategy()) {
        let summary = SummaryService::summarize(&entries).unwrap();
        prop_assert_eq!(
            summary.money_to_budget,
            summary.income.actual
                - (summary.expenses.actual + summary.funds.actual + summary.deductions.actual)
        );
        let total_actual: Decimal = entries.iter().map(|e| e.actual).sum();
        prop_assert_eq!(summary.income.actual + summary.total_actual_outflow, total_actual);
    }

    /// The latch fires exactly once per false-to-true transition.
    #[test]
    fn test_latch_counts_rising_edges(conditions in prop::collection::vec(any::<bool>(), 0..50)) {
        let mut latch = IncomeTargetLatch::new();
        let fired = conditions.iter().filter(|c| latch.observe_condition(**c)).count();
        let mut previous = false;
        let mut edges = 0;
        for &c in &conditions {
            if c && !previous {
                edges += 1;
            }
            previous = c;
        }
        prop_assert_eq!(fired, edges);
    }
}
