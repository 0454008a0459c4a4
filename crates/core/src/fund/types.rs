//! Fund data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tally_shared::types::FundId;

/// A savings fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    /// Fund ID.
    pub id: FundId,
    /// Unique name, shared with its fund-kind category.
    pub name: String,
    /// Target amount.
    pub goal: Decimal,
    /// Target date.
    pub goal_date: Option<NaiveDate>,
    /// Current balance.
    pub balance: Decimal,
    /// Planned monthly contribution.
    pub monthly_contribution: Decimal,
}

/// A fund with its derived progress figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSummary {
    /// Fund ID.
    pub id: FundId,
    /// Name.
    pub name: String,
    /// Target amount.
    pub goal: Decimal,
    /// Target date.
    pub goal_date: Option<NaiveDate>,
    /// Current balance.
    pub balance: Decimal,
    /// `balance / goal * 100`, unclamped.
    pub progress: Decimal,
    /// Progress clamped to `[0, 100]`.
    pub bar_width: Decimal,
    /// Whole months until the goal date; `None` without a goal date.
    pub months_remaining: Option<u32>,
    /// Planned monthly contribution.
    pub monthly_contribution: Decimal,
    /// Monthly amount needed to reach the goal on time.
    pub recommended_contribution: Decimal,
}

/// Compact list view: the first few funds plus a count of the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundPreview<'a> {
    /// Funds shown.
    pub shown: &'a [FundSummary],
    /// Number of funds not shown.
    pub hidden: usize,
}

impl FundPreview<'_> {
    /// `+K more` label, if anything is hidden.
    #[must_use]
    pub fn more_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("+{} more", self.hidden))
    }
}

/// How a transaction in a fund category moves the fund balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    /// Adds to the balance.
    Contribution(Decimal),
    /// Subtracts from the balance.
    Withdrawal(Decimal),
}

/// Validated fields of a new fund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFund {
    /// Name.
    pub name: String,
    /// Target amount.
    pub goal: Decimal,
    /// Target date.
    pub goal_date: Option<NaiveDate>,
    /// Opening balance.
    pub balance: Decimal,
    /// Planned monthly contribution.
    pub monthly_contribution: Decimal,
}

/// Validated partial update of a fund.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundPatch {
    /// New name.
    pub name: Option<String>,
    /// New target amount.
    pub goal: Option<Decimal>,
    /// New target date (`Some(None)` clears it).
    pub goal_date: Option<Option<NaiveDate>>,
    /// New monthly contribution.
    pub monthly_contribution: Option<Decimal>,
}

/// Raw fund fields as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundInput {
    /// Name.
    #[serde(default)]
    pub name: Option<String>,
    /// Target amount.
    #[serde(default, alias = "goal")]
    pub goal_amount: Option<serde_json::Value>,
    /// Opening balance.
    #[serde(default, alias = "balance")]
    pub current_balance: Option<serde_json::Value>,
    /// Monthly contribution.
    #[serde(default)]
    pub monthly_contribution: Option<serde_json::Value>,
    /// `YYYY-MM-DD`; `null` or empty clears it on update.
    #[serde(default, deserialize_with = "present")]
    pub goal_date: Option<Option<String>>,
}

/// Body of a contribute or withdraw request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundMovement {
    /// Amount.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    /// Notes for the generated transaction.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
