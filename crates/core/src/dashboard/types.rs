//! Dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fund::FundSummary;
use crate::ledger::TransactionRow;

/// Headline totals for a month or year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTotals {
    /// Gross income.
    pub gross_income: Decimal,
    /// Payroll deductions.
    pub deductions: Decimal,
    /// Gross income minus deductions.
    pub net_income: Decimal,
    /// Expenses outside fund categories.
    pub total_expenses: Decimal,
    /// Fund contributions and expenses booked to fund categories.
    pub total_savings: Decimal,
    /// Net income minus expenses and savings.
    pub left_to_budget: Decimal,
    /// Savings as a percentage of net income.
    pub savings_rate: Decimal,
}

/// Dashboard response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Month label (`March 2024`) for the monthly dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_month: Option<String>,
    /// Year for the annual dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,
    /// Totals.
    #[serde(flatten)]
    pub totals: DashboardTotals,
    /// Every fund.
    pub funds: Vec<FundSummary>,
    /// Most recent transactions, newest first.
    pub recent_transactions: Vec<TransactionRow>,
}
