//! Export record shapes.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CategoryId, TransactionId};

use crate::category::{Category, CategoryKind, kind_key};
use crate::fund::Fund;
use crate::ledger::{TransactionRow, TransactionType};

/// Category record of a JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Name.
    pub name: String,
    /// Storage key of the kind.
    #[serde(rename = "type", with = "kind_key")]
    pub kind: CategoryKind,
    /// Default monthly budget.
    pub default_budget: Decimal,
    /// Group name.
    pub parent_category: Option<String>,
}

impl From<&Category> for ExportCategory {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            kind: category.kind,
            default_budget: category.default_budget,
            parent_category: category.parent_category.clone(),
        }
    }
}

/// Transaction record of a JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTransaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Booking date.
    pub date: NaiveDate,
    /// Type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Category name.
    pub category: String,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Merchant.
    pub merchant: String,
    /// Notes.
    pub notes: String,
}

impl From<&TransactionRow> for ExportTransaction {
    fn from(row: &TransactionRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            transaction_type: row.transaction_type,
            category: row.category.clone(),
            amount: row.amount,
            description: row.description.clone(),
            merchant: row.merchant.clone(),
            notes: row.notes.clone(),
        }
    }
}

/// Fund record of a JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFund {
    /// Name.
    pub name: String,
    /// Goal.
    pub goal: Decimal,
    /// Balance.
    pub current_balance: Decimal,
    /// Target date.
    pub goal_date: Option<NaiveDate>,
    /// Planned monthly contribution.
    pub monthly_contribution: Decimal,
}

impl From<&Fund> for ExportFund {
    fn from(fund: &Fund) -> Self {
        Self {
            name: fund.name.clone(),
            goal: fund.goal,
            current_balance: fund.balance,
            goal_date: fund.goal_date,
            monthly_contribution: fund.monthly_contribution,
        }
    }
}

/// Monthly budget override record of a JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBudget {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Category name.
    pub category: String,
    /// Override amount.
    pub amount: Decimal,
}

/// Full JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// When the export was taken.
    pub export_date: NaiveDateTime,
    /// Categories.
    pub categories: Vec<ExportCategory>,
    /// Transactions.
    pub transactions: Vec<ExportTransaction>,
    /// Funds.
    pub funds: Vec<ExportFund>,
    /// Budget overrides.
    pub budgets: Vec<ExportBudget>,
}
