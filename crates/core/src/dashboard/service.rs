//! Dashboard totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::YearMonth;

use super::types::{DashboardData, DashboardTotals};
use crate::fund::{Fund, FundService, FundSummary};
use crate::ledger::{FlowRole, TransactionRow};
use crate::money;
use crate::validation::AmountError;

/// Number of transactions listed on the dashboard.
pub const RECENT_LIMIT: u64 = 10;

/// Dashboard service for business logic.
pub struct DashboardService;

impl DashboardService {
    /// Totals the transactions of a period.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a total overflows.
    pub fn totals(rows: &[TransactionRow]) -> Result<DashboardTotals, AmountError> {
        let sum = |role: FlowRole| {
            money::total(
                rows.iter()
                    .filter(|row| row.role() == role)
                    .map(|row| row.amount),
            )
        };
        let gross_income = sum(FlowRole::GrossIncome)?;
        let deductions = sum(FlowRole::Deduction)?;
        let net_income = money::sub(gross_income, deductions)?;
        let total_expenses = sum(FlowRole::Spending)?;
        let total_savings = sum(FlowRole::Saving)?;

        Ok(DashboardTotals {
            gross_income,
            deductions,
            net_income,
            total_expenses,
            total_savings,
            left_to_budget: money::sub(net_income, money::add(total_expenses, total_savings)?)?,
            savings_rate: money::percent(total_savings, net_income)?,
        })
    }

    /// Dashboard for one month.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a total overflows.
    pub fn monthly(
        month: YearMonth,
        rows: &[TransactionRow],
        funds: &[Fund],
        recent: Vec<TransactionRow>,
        today: NaiveDate,
    ) -> Result<DashboardData, AmountError> {
        Ok(DashboardData {
            current_month: Some(month.long_label()),
            current_year: None,
            totals: Self::totals(rows)?,
            funds: Self::summaries(funds, today)?,
            recent_transactions: recent,
        })
    }

    /// Dashboard for one calendar year.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a total overflows.
    pub fn annual(
        year: i32,
        rows: &[TransactionRow],
        funds: &[Fund],
        recent: Vec<TransactionRow>,
        today: NaiveDate,
    ) -> Result<DashboardData, AmountError> {
        Ok(DashboardData {
            current_month: None,
            current_year: Some(year),
            totals: Self::totals(rows)?,
            funds: Self::summaries(funds, today)?,
            recent_transactions: recent,
        })
    }

    fn summaries(funds: &[Fund], today: NaiveDate) -> Result<Vec<FundSummary>, AmountError> {
        funds
            .iter()
            .map(|fund| FundService::summarize(fund, today))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryKind;
    use crate::ledger::TransactionType;
    use crate::validation::MAX_AMOUNT;
    use rust_decimal_macros::dec;
    use tally_shared::types::{CategoryId, TransactionId};

    fn tx(tx_type: TransactionType, kind: CategoryKind, amount: Decimal) -> TransactionRow {
        TransactionRow {
            id: TransactionId::new(1),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            transaction_type: tx_type,
            amount,
            category_id: CategoryId::new(1),
            category: "X".to_string(),
            category_kind: kind,
            parent_category: None,
            description: String::new(),
            merchant: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_totals_split_by_role() {
        let rows = vec![
            tx(TransactionType::Income, CategoryKind::SALARY, dec!(4000)),
            tx(TransactionType::Income, CategoryKind::DEDUCTION, dec!(1000)),
            tx(TransactionType::Expense, CategoryKind::Expense, dec!(1200)),
            tx(TransactionType::Expense, CategoryKind::Fund, dec!(200)),
            tx(TransactionType::FundContribution, CategoryKind::Fund, dec!(100)),
            tx(TransactionType::FundWithdrawal, CategoryKind::Fund, dec!(50)),
        ];
        let totals = DashboardService::totals(&rows).unwrap();
        assert_eq!(totals.gross_income, dec!(4000));
        assert_eq!(totals.deductions, dec!(1000));
        assert_eq!(totals.net_income, dec!(3000));
        assert_eq!(totals.total_expenses, dec!(1200));
        assert_eq!(totals.total_savings, dec!(300));
        assert_eq!(totals.left_to_budget, dec!(1500));
        assert_eq!(totals.savings_rate, dec!(10));
    }

    #[test]
    fn test_savings_rate_zero_without_net_income() {
        let rows = vec![tx(TransactionType::FundContribution, CategoryKind::Fund, dec!(100))];
        assert_eq!(DashboardService::totals(&rows).unwrap().savings_rate, dec!(0));
    }

    #[test]
    fn test_wire_shape() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let data = DashboardService::monthly(YearMonth::new(2024, 3).unwrap(), &[], &[], Vec::new(), today)
            .unwrap();
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["current_month"], "March 2024");
        assert!(value.get("current_year").is_none());
        assert_eq!(value["net_income"], 0.0);
        assert!(value["recent_transactions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_largest_amounts_in_every_role() {
        let rows = vec![
            tx(TransactionType::Income, CategoryKind::SALARY, MAX_AMOUNT),
            tx(TransactionType::Income, CategoryKind::DEDUCTION, MAX_AMOUNT),
            tx(TransactionType::Expense, CategoryKind::Expense, MAX_AMOUNT),
            tx(TransactionType::FundContribution, CategoryKind::Fund, MAX_AMOUNT),
        ];
        let totals = DashboardService::totals(&rows).unwrap();
        assert_eq!(totals.net_income, dec!(0));
        assert_eq!(totals.left_to_budget, MAX_AMOUNT * dec!(-2));
        assert_eq!(totals.savings_rate, dec!(0));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let rows = vec![
            tx(TransactionType::Expense, CategoryKind::Expense, Decimal::MAX),
            tx(TransactionType::Expense, CategoryKind::Expense, Decimal::MAX),
        ];
        assert_eq!(
            DashboardService::totals(&rows).unwrap_err(),
            AmountError::OutOfRange
        );
    }
}
