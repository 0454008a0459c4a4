//! Report data types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fund::FundSummary;

/// Monthly summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month label, e.g. `March 2024`.
    pub month: String,
    /// Gross income by category.
    pub income_breakdown: BTreeMap<String, Decimal>,
    /// Deductions by category.
    pub deduction_breakdown: BTreeMap<String, Decimal>,
    /// Expenses by group (or category when ungrouped).
    pub expense_breakdown: BTreeMap<String, Decimal>,
    /// Fund contributions by category.
    pub savings_breakdown: BTreeMap<String, Decimal>,
    /// Gross income.
    pub gross_income: Decimal,
    /// Deductions.
    pub deductions: Decimal,
    /// Gross income minus deductions.
    pub net_income: Decimal,
    /// Expenses.
    pub total_expenses: Decimal,
    /// Savings.
    pub total_savings: Decimal,
    /// Savings as a percentage of net income.
    pub savings_rate: Decimal,
    /// Net income minus expenses and savings.
    pub leftover: Decimal,
}

/// Year at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualOverview {
    /// Year.
    pub year: i32,
    /// Month abbreviations, January up to the current month.
    pub months: Vec<String>,
    /// Gross income per month.
    pub monthly_income: Vec<Decimal>,
    /// Expenses and deductions per month.
    pub monthly_expenses: Vec<Decimal>,
    /// Sum of `monthly_income`.
    pub total_income: Decimal,
    /// Sum of `monthly_expenses`.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub total_saved: Decimal,
}

/// One line of a category analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// Group or category name.
    pub name: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Share of the month's total.
    pub percentage: Decimal,
}

/// Where a month's money went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    /// Month key, `YYYY-MM`.
    pub month: String,
    /// Lines sorted by amount, largest first.
    pub categories: Vec<CategoryShare>,
    /// Total spent.
    pub total: Decimal,
}

/// Direction of spending over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// Recent months above the earlier average.
    #[serde(rename = "increasing")]
    Increasing,
    /// Recent months at or below the earlier average.
    #[serde(rename = "decreasing")]
    Decreasing,
    /// Fewer than two months.
    #[serde(rename = "insufficient data")]
    InsufficientData,
}

/// Spending trend report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingTrends {
    /// Month labels, e.g. `Mar 2024`.
    pub months: Vec<String>,
    /// Outflow per month.
    pub expenses: Vec<Decimal>,
    /// Mean outflow.
    pub average_spending: Decimal,
    /// Label of the month with the highest outflow.
    pub highest_month: String,
    /// Highest outflow.
    pub highest_amount: Decimal,
    /// Direction.
    pub trend: Trend,
}

/// Outflow totals for a run of months.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSeries {
    /// Month labels.
    pub months: Vec<String>,
    /// Outflow per month.
    pub totals: Vec<Decimal>,
}

/// Two periods side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodComparison {
    /// First period.
    pub period1: PeriodSeries,
    /// Second period.
    pub period2: PeriodSeries,
}

/// Fund progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundProgressReport {
    /// Every fund with its progress figures.
    pub funds: Vec<FundSummary>,
}

/// Flow graph node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SankeyNodeType {
    /// The central budget node.
    Budget,
    /// Income category.
    Income,
    /// Deduction category.
    Deduction,
    /// Category group.
    Group,
    /// Expense category.
    Expense,
    /// Fund category.
    Fund,
}

/// Flow graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyNode {
    /// Display name.
    pub name: String,
    /// Node type.
    #[serde(rename = "type")]
    pub node_type: SankeyNodeType,
}

/// Flow graph link between two node indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyLink {
    /// Source node index.
    pub source: usize,
    /// Target node index.
    pub target: usize,
    /// Amount flowing.
    pub value: Decimal,
}

/// Flow graph of money through the budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyGraph {
    /// Nodes; index 0 is the budget node.
    pub nodes: Vec<SankeyNode>,
    /// Links, one per (source, target) pair.
    pub links: Vec<SankeyLink>,
}

/// Flow graph period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SankeyPeriod {
    /// One calendar month.
    Monthly,
    /// One calendar year.
    Annual,
}
