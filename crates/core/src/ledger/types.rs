//! Ledger domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::YearMonth;
use tally_shared::types::{CategoryId, TransactionId};

use super::error::TransactionError;
use crate::category::{CategoryKind, IncomeKind, kind_key};

/// Transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money coming in (booked to a deduction category it is a payroll deduction).
    Income,
    /// Money going out.
    Expense,
    /// Deposit into a savings fund.
    FundContribution,
    /// Withdrawal from a savings fund.
    FundWithdrawal,
}

impl TransactionType {
    /// Every transaction type.
    pub const ALL: [Self; 4] = [
        Self::Income,
        Self::Expense,
        Self::FundContribution,
        Self::FundWithdrawal,
    ];

    /// Wire and storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::FundContribution => "fund_contribution",
            Self::FundWithdrawal => "fund_withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TransactionError::InvalidType(trimmed.to_string()))
    }
}

/// Where a transaction's money goes in summary totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowRole {
    /// Gross income.
    GrossIncome,
    /// Payroll deduction.
    Deduction,
    /// Ordinary spending.
    Spending,
    /// Money put into a savings fund.
    Saving,
    /// Money taken out of a savings fund.
    Withdrawal,
}

impl FlowRole {
    /// Classifies a transaction by its type and the kind of its category.
    #[must_use]
    pub const fn of(tx_type: TransactionType, kind: CategoryKind) -> Self {
        match (tx_type, kind) {
            (TransactionType::Income, CategoryKind::Income(IncomeKind::Deduction)) => {
                Self::Deduction
            }
            (TransactionType::Income, _) => Self::GrossIncome,
            (TransactionType::Expense, CategoryKind::Fund) | (TransactionType::FundContribution, _) => {
                Self::Saving
            }
            (TransactionType::Expense, _) => Self::Spending,
            (TransactionType::FundWithdrawal, _) => Self::Withdrawal,
        }
    }

    /// Whether the role counts as outflow in spending reports.
    #[must_use]
    pub const fn is_spending_outflow(self) -> bool {
        matches!(self, Self::Spending | Self::Deduction)
    }
}

/// A transaction joined with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    /// Transaction ID.
    pub id: TransactionId,
    /// Booking date.
    pub date: NaiveDate,
    /// Transaction type.
    #[serde(rename = "type", alias = "transaction_type")]
    pub transaction_type: TransactionType,
    /// Amount, always non-negative.
    pub amount: Decimal,
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub category: String,
    /// Category kind as its storage key (`income`, `deduction`, `expense`, `fund`).
    #[serde(rename = "category_type", with = "kind_key")]
    pub category_kind: CategoryKind,
    /// Category's group name.
    #[serde(default)]
    pub parent_category: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Merchant.
    #[serde(default)]
    pub merchant: String,
    /// Notes.
    #[serde(default)]
    pub notes: String,
}

impl TransactionRow {
    /// Summary role of this transaction.
    #[must_use]
    pub const fn role(&self) -> FlowRole {
        FlowRole::of(self.transaction_type, self.category_kind)
    }

    /// Whether the row is displayed as an outflow (negative).
    #[must_use]
    pub const fn is_outflow(&self) -> bool {
        matches!(
            self.transaction_type,
            TransactionType::Expense | TransactionType::FundWithdrawal
        ) || self.category_kind.is_deduction()
    }

    /// Group name for reports: the parent group, or the category itself.
    #[must_use]
    pub fn group_or_category(&self) -> &str {
        self.parent_category.as_deref().unwrap_or(&self.category)
    }
}

/// Ledger filter: month, type, category and free-text search.
///
/// Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Month the transaction date must fall in.
    pub month: Option<YearMonth>,
    /// Transaction type.
    pub transaction_type: Option<TransactionType>,
    /// Category ID.
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring of description, merchant and notes.
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Builds a filter from raw query parameters; blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed month, type or category ID.
    pub fn from_params(
        month: Option<&str>,
        transaction_type: Option<&str>,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, TransactionError> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }
        Ok(Self {
            month: present(month).map(str::parse::<YearMonth>).transpose()?,
            transaction_type: present(transaction_type)
                .map(str::parse::<TransactionType>)
                .transpose()?,
            category_id: present(category)
                .map(|raw| raw.parse().map_err(|_| TransactionError::InvalidCategory))
                .transpose()?,
            search: search.filter(|s| !s.is_empty()).map(str::to_string),
        })
    }

    /// Query parameters for this filter (blank criteria omitted).
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(month) = self.month {
            query.push(("month", month.to_string()));
        }
        if let Some(tx_type) = self.transaction_type {
            query.push(("type", tx_type.as_str().to_string()));
        }
        if let Some(category) = self.category_id {
            query.push(("category", category.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }

    /// Whether a transaction is visible under this filter.
    #[must_use]
    pub fn matches(&self, row: &TransactionRow) -> bool {
        if let Some(month) = self.month {
            if !month.contains(row.date) {
                return false;
            }
        }
        if self.transaction_type.is_some_and(|t| t != row.transaction_type) {
            return false;
        }
        if self.category_id.is_some_and(|c| c != row.category_id) {
            return false;
        }
        match &self.search {
            Some(search) => {
                let haystack =
                    format!("{} {} {}", row.description, row.merchant, row.notes).to_lowercase();
                haystack.contains(&search.to_lowercase())
            }
            None => true,
        }
    }
}

/// A ledger row ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    /// Transaction ID.
    pub id: TransactionId,
    /// Booking date.
    pub date: NaiveDate,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Category name.
    pub category: String,
    /// Description.
    pub description: String,
    /// Merchant.
    pub merchant: String,
    /// Notes.
    pub notes: String,
    /// Amount with display sign (outflows negative).
    pub signed_amount: Decimal,
    /// Formatted amount, e.g. `-$12.50`.
    pub amount_label: String,
    /// Whether the row is an outflow.
    pub is_outflow: bool,
}

/// Validated transaction fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Booking date (not in the future).
    pub date: NaiveDate,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Amount (non-negative).
    pub amount: Decimal,
    /// Category ID.
    pub category_id: CategoryId,
    /// Description.
    pub description: String,
    /// Merchant.
    pub merchant: String,
    /// Notes.
    pub notes: String,
}

/// Validated partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New type.
    pub transaction_type: Option<TransactionType>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New category.
    pub category_id: Option<CategoryId>,
    /// New description.
    pub description: Option<String>,
    /// New merchant.
    pub merchant: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

impl TransactionPatch {
    /// Applies the patch to the current state.
    #[must_use]
    pub fn apply_to(self, current: TransactionDraft) -> TransactionDraft {
        TransactionDraft {
            date: self.date.unwrap_or(current.date),
            transaction_type: self.transaction_type.unwrap_or(current.transaction_type),
            amount: self.amount.unwrap_or(current.amount),
            category_id: self.category_id.unwrap_or(current.category_id),
            description: self.description.unwrap_or(current.description),
            merchant: self.merchant.unwrap_or(current.merchant),
            notes: self.notes.unwrap_or(current.notes),
        }
    }
}

/// Raw transaction fields as submitted by a client.
///
/// Amounts and category IDs are accepted as numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<serde_json::Value>,
    /// Transaction type.
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    /// Category ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<serde_json::Value>,
    /// `YYYY-MM-DD` date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
