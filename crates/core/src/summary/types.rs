//! Summary types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Budgeted and actual totals of one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    /// Sum of budgets.
    pub budgeted: Decimal,
    /// Sum of actuals.
    pub actual: Decimal,
}

/// Month-level budget summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Salary income.
    pub income: BucketTotals,
    /// Payroll deductions.
    pub deductions: BucketTotals,
    /// Expenses.
    pub expenses: BucketTotals,
    /// Fund contributions.
    pub funds: BucketTotals,
    /// Expense + fund + deduction budgets.
    pub total_budgeted_outflow: Decimal,
    /// Expense + fund + deduction actuals.
    pub total_actual_outflow: Decimal,
    /// Income actual minus all actual outflow.
    pub money_to_budget: Decimal,
    /// Income actual as a percentage of the income budget.
    pub income_percent: Decimal,
    /// Actual outflow as a percentage of budgeted outflow.
    pub expense_percent: Decimal,
}

impl BudgetSummary {
    /// Whether income has exceeded its target.
    #[must_use]
    pub fn income_over_target(&self) -> bool {
        self.income.actual > self.income.budgeted
    }
}
