//! Summary calculator.

use rust_decimal::Decimal;

use super::types::{BucketTotals, BudgetSummary};
use crate::budget::BudgetFigures;
use crate::category::CategoryService;
use crate::money;
use crate::validation::AmountError;

/// Summary service for business logic.
pub struct SummaryService;

impl SummaryService {
    /// Totals a month's comparison entries into the four buckets.
    ///
    /// Empty buckets contribute zero.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a total overflows.
    pub fn summarize<T: BudgetFigures>(entries: &[T]) -> Result<BudgetSummary, AmountError> {
        let buckets = CategoryService::partition(entries);
        let income = Self::totals(&buckets.income)?;
        let deductions = Self::totals(&buckets.deductions)?;
        let expenses = Self::totals(&buckets.expenses)?;
        let funds = Self::totals(&buckets.funds)?;

        let total_budgeted_outflow =
            money::total([expenses.budgeted, funds.budgeted, deductions.budgeted])?;
        let total_actual_outflow = money::total([expenses.actual, funds.actual, deductions.actual])?;

        Ok(BudgetSummary {
            income,
            deductions,
            expenses,
            funds,
            total_budgeted_outflow,
            total_actual_outflow,
            money_to_budget: money::sub(income.actual, total_actual_outflow)?,
            income_percent: Self::percent(income.actual, income.budgeted)?,
            expense_percent: Self::percent(total_actual_outflow, total_budgeted_outflow)?,
        })
    }

    /// `part / whole * 100` rounded to cents, or zero when `whole` is not positive.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the ratio overflows.
    pub fn percent(part: Decimal, whole: Decimal) -> Result<Decimal, AmountError> {
        money::percent(part, whole)
    }

    fn totals<T: BudgetFigures>(items: &[&T]) -> Result<BucketTotals, AmountError> {
        items.iter().try_fold(BucketTotals::default(), |acc, item| -> Result<_, AmountError> {
            Ok(BucketTotals {
                budgeted: money::add(acc.budgeted, item.budgeted())?,
                actual: money::add(acc.actual, item.actual())?,
            })
        })
    }
}

/// Edge-triggered "income target exceeded" notification.
///
/// Fires on the first recomputation where income exceeds its target and stays
/// quiet until the condition has been false at least once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncomeTargetLatch {
    armed: bool,
}

impl IncomeTargetLatch {
    /// New latch in the reset state.
    #[must_use]
    pub const fn new() -> Self {
        Self { armed: false }
    }

    /// Feeds one recomputation; returns `true` when the notification should fire.
    pub fn observe(&mut self, summary: &BudgetSummary) -> bool {
        self.observe_condition(summary.income_over_target())
    }

    /// Feeds the raw condition.
    pub fn observe_condition(&mut self, over_target: bool) -> bool {
        let fire = over_target && !self.armed;
        self.armed = over_target;
        fire
    }
}
