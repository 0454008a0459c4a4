//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CategoryGroupId, CategoryId};

use crate::category::{CategoryKind, Classified};

/// Over/under budget classification.
///
/// `Under` means the good side of the target: at or above it for salary
/// income, at or below it for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// On the good side of the target.
    Under,
    /// On the bad side of the target.
    Over,
}

/// Anything carrying a budgeted and an actual amount for one category kind.
pub trait BudgetFigures: Classified {
    /// Budgeted amount.
    fn budgeted(&self) -> Decimal;
    /// Actual amount.
    fn actual(&self) -> Decimal;
}

/// A category with its budget resolved for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Kind (serialized as `type` + `is_deduction`).
    #[serde(flatten)]
    pub kind: CategoryKind,
    /// Group name.
    pub parent_category: Option<String>,
    /// Display order.
    pub sort_order: i32,
    /// Budget for months without an override.
    pub default_budget: Decimal,
    /// Budget in effect for the month.
    pub monthly_budget: Decimal,
    /// Whether `monthly_budget` comes from a month override.
    pub is_override: bool,
}

impl Classified for MonthlyCategory {
    fn kind(&self) -> CategoryKind {
        self.kind
    }

    fn parent_category(&self) -> Option<&str> {
        self.parent_category.as_deref()
    }
}

/// Budget vs actual for one category in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Category ID (join key).
    pub category_id: CategoryId,
    /// Category name (display only).
    pub category: String,
    /// Kind (serialized as `type` + `is_deduction`).
    #[serde(flatten)]
    pub kind: CategoryKind,
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Signed remaining amount (positive is good).
    pub difference: Decimal,
    /// Unclamped progress percentage.
    pub percentage: Decimal,
    /// Over/under classification.
    pub status: BudgetStatus,
}

impl Classified for ComparisonEntry {
    fn kind(&self) -> CategoryKind {
        self.kind
    }
}

impl BudgetFigures for ComparisonEntry {
    fn budgeted(&self) -> Decimal {
        self.budgeted
    }

    fn actual(&self) -> Decimal {
        self.actual
    }
}

/// Progress figures for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Unclamped percentage of the target reached.
    pub percent: Decimal,
    /// Percentage clamped to `[0, 100]` for bar width.
    pub bar_width: Decimal,
    /// Over/under classification driven by the unclamped value.
    pub status: BudgetStatus,
}

/// A category row on the budget board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRow {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Kind.
    #[serde(flatten)]
    pub kind: CategoryKind,
    /// Group name.
    pub parent_category: Option<String>,
    /// Budgeted amount for the month.
    pub budgeted: Decimal,
    /// Actual amount for the month.
    pub actual: Decimal,
    /// Signed remaining amount.
    pub remaining: Decimal,
    /// Progress figures.
    pub progress: Progress,
}

impl Classified for BudgetRow {
    fn kind(&self) -> CategoryKind {
        self.kind
    }

    fn parent_category(&self) -> Option<&str> {
        self.parent_category.as_deref()
    }
}

impl BudgetFigures for BudgetRow {
    fn budgeted(&self) -> Decimal {
        self.budgeted
    }

    fn actual(&self) -> Decimal {
        self.actual
    }
}

/// Totals for one category group on the budget board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBudget {
    /// Group ID; `None` for "Other".
    pub group_id: Option<CategoryGroupId>,
    /// Group name.
    pub name: String,
    /// Sum of member budgets.
    pub budgeted: Decimal,
    /// Sum of member actuals.
    pub actual: Decimal,
    /// Sum of the members' signed remaining values.
    pub remaining: Decimal,
    /// Member rows.
    pub rows: Vec<BudgetRow>,
}
