//! Budget service for budget vs actual aggregation.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::types::{
    BudgetRow, BudgetStatus, ComparisonEntry, GroupBudget, MonthlyCategory, Progress,
};
use crate::category::{CategoryGroup, CategoryKind, CategoryService, CategoryType, IncomeKind};
use crate::ledger::TransactionType;
use crate::money;
use crate::validation::AmountError;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Signed remaining amount for a category.
    ///
    /// For salary income: remaining = actual - budgeted
    ///   - Positive (over target) is good
    ///
    /// For expenses, funds and deductions: remaining = budgeted - actual
    ///   - Positive (under budget) is good
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the difference overflows.
    pub fn remaining(kind: CategoryKind, budgeted: Decimal, actual: Decimal) -> Result<Decimal, AmountError> {
        match kind {
            CategoryKind::Income(IncomeKind::Salary) => money::sub(actual, budgeted),
            CategoryKind::Income(IncomeKind::Deduction)
            | CategoryKind::Expense
            | CategoryKind::Fund => money::sub(budgeted, actual),
        }
    }

    /// Percentage of the target reached, unclamped.
    ///
    /// A zero budget reads as 100% once anything was spent or earned, else 0%.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the ratio overflows.
    pub fn progress_percent(budgeted: Decimal, actual: Decimal) -> Result<Decimal, AmountError> {
        if budgeted > Decimal::ZERO {
            money::percent(actual, budgeted)
        } else if actual > Decimal::ZERO {
            Ok(Decimal::ONE_HUNDRED)
        } else {
            Ok(Decimal::ZERO)
        }
    }

    /// Clamps a percentage to `[0, 100]` for a progress bar.
    #[must_use]
    pub fn bar_width(percent: Decimal) -> Decimal {
        percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    /// Over/under classification.
    #[must_use]
    pub fn status(kind: CategoryKind, budgeted: Decimal, actual: Decimal) -> BudgetStatus {
        let good = if kind.is_salary() {
            actual >= budgeted
        } else {
            actual <= budgeted
        };
        if good {
            BudgetStatus::Under
        } else {
            BudgetStatus::Over
        }
    }

    /// Progress figures for a category.
    ///
    /// # Errors
    ///
    /// See [`progress_percent`](Self::progress_percent).
    pub fn progress(kind: CategoryKind, budgeted: Decimal, actual: Decimal) -> Result<Progress, AmountError> {
        let percent = Self::progress_percent(budgeted, actual)?;
        Ok(Progress {
            percent,
            bar_width: Self::bar_width(percent),
            status: Self::status(kind, budgeted, actual),
        })
    }

    /// Budget in effect for a month: the override if one exists, else the default.
    #[must_use]
    pub fn resolve_monthly_budget(default_budget: Decimal, month_override: Option<Decimal>) -> Decimal {
        month_override.unwrap_or(default_budget)
    }

    /// Whether a transaction of `tx_type` counts toward a category's actual.
    ///
    /// Income kinds count income; expenses count expenses; funds count
    /// expenses and explicit contributions. Withdrawals never count.
    #[must_use]
    pub const fn counts_toward_actual(kind: CategoryKind, tx_type: TransactionType) -> bool {
        match kind {
            CategoryKind::Income(_) => matches!(tx_type, TransactionType::Income),
            CategoryKind::Expense => matches!(tx_type, TransactionType::Expense),
            CategoryKind::Fund => matches!(
                tx_type,
                TransactionType::Expense | TransactionType::FundContribution
            ),
        }
    }

    /// Sums the transactions that count toward a category's actual.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the total overflows.
    pub fn actual_from<I>(kind: CategoryKind, transactions: I) -> Result<Decimal, AmountError>
    where
        I: IntoIterator<Item = (TransactionType, Decimal)>,
    {
        money::total(
            transactions
                .into_iter()
                .filter(|(tx_type, _)| Self::counts_toward_actual(kind, *tx_type))
                .map(|(_, amount)| amount),
        )
    }

    /// Builds the comparison entry for one category.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a derived figure overflows.
    pub fn compare(category: &MonthlyCategory, actual: Decimal) -> Result<ComparisonEntry, AmountError> {
        let budgeted = category.monthly_budget;
        let progress = Self::progress(category.kind, budgeted, actual)?;
        Ok(ComparisonEntry {
            category_id: category.id,
            category: category.name.clone(),
            kind: category.kind,
            budgeted,
            actual,
            difference: Self::remaining(category.kind, budgeted, actual)?,
            percentage: progress.percent,
            status: progress.status,
        })
    }

    /// Joins the month's categories with its comparison entries by category ID.
    ///
    /// The budget comes from the category list; a category without an entry
    /// has an actual of zero.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a derived figure overflows.
    pub fn build_rows(
        categories: &[MonthlyCategory],
        entries: &[ComparisonEntry],
    ) -> Result<Vec<BudgetRow>, AmountError> {
        let actuals: HashMap<_, _> = entries
            .iter()
            .map(|entry| (entry.category_id, entry.actual))
            .collect();

        categories
            .iter()
            .map(|category| -> Result<BudgetRow, AmountError> {
                let budgeted = category.monthly_budget;
                let actual = actuals.get(&category.id).copied().unwrap_or(Decimal::ZERO);
                Ok(BudgetRow {
                    category_id: category.id,
                    name: category.name.clone(),
                    kind: category.kind,
                    parent_category: category.parent_category.clone(),
                    budgeted,
                    actual,
                    remaining: Self::remaining(category.kind, budgeted, actual)?,
                    progress: Self::progress(category.kind, budgeted, actual)?,
                })
            })
            .collect()
    }

    /// Rolls rows of one category type up into their groups.
    ///
    /// Group `remaining` is the sum of the members' signed remaining values,
    /// never `budgeted - actual` of the group totals.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a group total overflows.
    pub fn group_rows(
        rows: &[BudgetRow],
        groups: &[CategoryGroup],
        category_type: CategoryType,
    ) -> Result<Vec<GroupBudget>, AmountError> {
        CategoryService::group_by_parent(rows, groups, category_type)
            .into_iter()
            .map(|section| -> Result<GroupBudget, AmountError> {
                let members: Vec<BudgetRow> = section.members.into_iter().cloned().collect();
                Ok(GroupBudget {
                    group_id: section.group_id,
                    name: section.name,
                    budgeted: money::total(members.iter().map(|r| r.budgeted))?,
                    actual: money::total(members.iter().map(|r| r.actual))?,
                    remaining: money::total(members.iter().map(|r| r.remaining))?,
                    rows: members,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::{CategoryGroupId, CategoryId};

    fn monthly(id: i32, name: &str, kind: CategoryKind, parent: &str, budget: Decimal) -> MonthlyCategory {
        MonthlyCategory {
            id: CategoryId::new(id),
            name: name.to_string(),
            kind,
            parent_category: Some(parent.to_string()),
            sort_order: id,
            default_budget: budget,
            monthly_budget: budget,
            is_override: false,
        }
    }

    #[test]
    fn test_salary_remaining_is_actual_minus_budget() {
        assert_eq!(
            BudgetService::remaining(CategoryKind::SALARY, dec!(5000), dec!(5200)).unwrap(),
            dec!(200)
        );
        assert_eq!(
            BudgetService::status(CategoryKind::SALARY, dec!(5000), dec!(5200)),
            BudgetStatus::Under
        );
        assert_eq!(
            BudgetService::status(CategoryKind::SALARY, dec!(5000), dec!(4000)),
            BudgetStatus::Over
        );
    }

    #[test]
    fn test_other_kinds_remaining_is_budget_minus_actual() {
        for kind in [CategoryKind::DEDUCTION, CategoryKind::Expense, CategoryKind::Fund] {
            assert_eq!(BudgetService::remaining(kind, dec!(800), dec!(600)).unwrap(), dec!(200));
            assert_eq!(BudgetService::status(kind, dec!(800), dec!(800)), BudgetStatus::Under);
            assert_eq!(BudgetService::status(kind, dec!(800), dec!(801)), BudgetStatus::Over);
        }
    }

    #[test]
    fn test_progress_zero_budget_edges() {
        assert_eq!(BudgetService::progress_percent(dec!(0), dec!(0)).unwrap(), dec!(0));
        assert_eq!(BudgetService::progress_percent(dec!(0), dec!(12)).unwrap(), dec!(100));
        assert_eq!(BudgetService::progress_percent(dec!(200), dec!(50)).unwrap(), dec!(25));
    }

    #[test]
    fn test_bar_width_is_clamped_but_status_uses_raw_value() {
        let progress = BudgetService::progress(CategoryKind::Expense, dec!(100), dec!(150)).unwrap();
        assert_eq!(progress.percent, dec!(150));
        assert_eq!(progress.bar_width, dec!(100));
        assert_eq!(progress.status, BudgetStatus::Over);
    }

    #[test]
    fn test_actual_rules_per_kind() {
        let txs = vec![
            (TransactionType::Income, dec!(100)),
            (TransactionType::Expense, dec!(40)),
            (TransactionType::FundContribution, dec!(25)),
            (TransactionType::FundWithdrawal, dec!(10)),
        ];
        assert_eq!(BudgetService::actual_from(CategoryKind::SALARY, txs.clone()).unwrap(), dec!(100));
        assert_eq!(BudgetService::actual_from(CategoryKind::DEDUCTION, txs.clone()).unwrap(), dec!(100));
        assert_eq!(BudgetService::actual_from(CategoryKind::Expense, txs.clone()).unwrap(), dec!(40));
        assert_eq!(BudgetService::actual_from(CategoryKind::Fund, txs).unwrap(), dec!(65));
    }

    #[test]
    fn test_override_resolution() {
        assert_eq!(BudgetService::resolve_monthly_budget(dec!(100), Some(dec!(150))), dec!(150));
        assert_eq!(BudgetService::resolve_monthly_budget(dec!(100), None), dec!(100));
    }

    #[test]
    fn test_rows_join_by_id_not_name() {
        let categories = vec![
            monthly(1, "Rent", CategoryKind::Expense, "Housing", dec!(1500)),
            monthly(2, "Rent", CategoryKind::Expense, "Storage", dec!(100)),
        ];
        let mut entry = BudgetService::compare(&categories[1], dec!(90)).unwrap();
        entry.category = "Renamed Since".to_string();

        let rows = BudgetService::build_rows(&categories, &[entry]).unwrap();
        assert_eq!(rows[0].actual, dec!(0));
        assert_eq!(rows[1].actual, dec!(90));
        assert_eq!(rows[1].remaining, dec!(10));
    }

    #[test]
    fn test_mixed_sign_group_remaining_sums_members() {
        let categories = vec![
            monthly(1, "Salary", CategoryKind::SALARY, "Pay", dec!(5000)),
            monthly(2, "Tax Deduction", CategoryKind::DEDUCTION, "Pay", dec!(800)),
        ];
        let entries = vec![
            BudgetService::compare(&categories[0], dec!(5200)).unwrap(),
            BudgetService::compare(&categories[1], dec!(900)).unwrap(),
        ];
        let rows = BudgetService::build_rows(&categories, &entries).unwrap();
        let groups = vec![CategoryGroup {
            id: CategoryGroupId::new(1),
            name: "Pay".to_string(),
            kind: CategoryKind::SALARY,
            sort_order: 0,
        }];

        let pay = BudgetService::group_rows(&rows, &groups, CategoryType::Income).unwrap();
        assert_eq!(pay.len(), 1);
        assert_eq!(pay[0].rows.len(), 2);
        assert_eq!(pay[0].budgeted, dec!(5800));
        assert_eq!(pay[0].actual, dec!(6100));
        // 200 from salary, -100 from the overspent deduction.
        assert_eq!(pay[0].remaining, dec!(100));
        assert_ne!(pay[0].remaining, pay[0].budgeted - pay[0].actual);
    }

    #[test]
    fn test_comparison_entry_wire_shape() {
        let category = monthly(7, "401k Deduction", CategoryKind::DEDUCTION, "Deductions", dec!(300));
        let value = serde_json::to_value(BudgetService::compare(&category, dec!(300)).unwrap()).unwrap();
        assert_eq!(value["category_id"], 7);
        assert_eq!(value["category"], "401k Deduction");
        assert_eq!(value["type"], "income");
        assert_eq!(value["is_deduction"], true);
        assert_eq!(value["status"], "under");
        assert_eq!(value["difference"], 0.0);
    }
}
