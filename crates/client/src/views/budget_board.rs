//! Budget board: category rows grouped per type, with the month summary.

use rust_decimal::Decimal;
use tally_core::budget::{BudgetRow, BudgetService, ComparisonEntry, GroupBudget, MonthlyCategory};
use tally_core::category::{CategoryGroup, CategoryType};
use tally_core::summary::{BudgetSummary, IncomeTargetLatch, SummaryService};
use tally_shared::YearMonth;
use tally_shared::types::CategoryId;

use crate::client::ApiClient;
use crate::error::ClientError;

/// Section order on the board.
const SECTIONS: [CategoryType; 3] = [CategoryType::Income, CategoryType::Expense, CategoryType::Fund];

/// State of the budget board for one month.
#[derive(Debug, Clone)]
pub struct BudgetBoard {
    month: YearMonth,
    rows: Vec<BudgetRow>,
    sections: Vec<(CategoryType, Vec<GroupBudget>)>,
    summary: BudgetSummary,
    latch: IncomeTargetLatch,
}

impl BudgetBoard {
    /// Empty board for `month`.
    #[must_use]
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            rows: Vec::new(),
            sections: Vec::new(),
            summary: BudgetSummary::default(),
            latch: IncomeTargetLatch::new(),
        }
    }

    /// Month shown.
    #[must_use]
    pub const fn month(&self) -> YearMonth {
        self.month
    }

    /// Switches to another month; the next [`load`](Self::load) fetches it.
    pub fn select_month(&mut self, month: YearMonth) {
        self.month = month;
    }

    /// Every category row in display order.
    #[must_use]
    pub fn rows(&self) -> &[BudgetRow] {
        &self.rows
    }

    /// Group sections of one type.
    #[must_use]
    pub fn section(&self, category_type: CategoryType) -> &[GroupBudget] {
        self.sections
            .iter()
            .find(|(kind, _)| *kind == category_type)
            .map_or(&[], |(_, groups)| groups.as_slice())
    }

    /// Month summary.
    #[must_use]
    pub const fn summary(&self) -> &BudgetSummary {
        &self.summary
    }

    /// Recomputes the board from fetched data.
    ///
    /// Returns `true` when the "income exceeded target" notification should be
    /// shown. It fires once per transition into that state.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Amount` when a total overflows; the board keeps
    /// its previous state.
    pub fn apply(
        &mut self,
        categories: &[MonthlyCategory],
        groups: &[CategoryGroup],
        entries: &[ComparisonEntry],
    ) -> Result<bool, ClientError> {
        let rows = BudgetService::build_rows(categories, entries)?;
        let sections = SECTIONS
            .iter()
            .map(|&category_type| {
                BudgetService::group_rows(&rows, groups, category_type)
                    .map(|groups| (category_type, groups))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let summary = SummaryService::summarize(&rows)?;

        self.rows = rows;
        self.sections = sections;
        self.summary = summary;
        Ok(self.latch.observe(&self.summary))
    }

    /// Fetches the month and recomputes the board.
    ///
    /// # Errors
    ///
    /// Returns the first failed request; the board keeps its previous state.
    pub async fn load(&mut self, client: &ApiClient) -> Result<bool, ClientError> {
        let categories = client.month_budget(self.month).await?;
        let groups = client.category_groups(None).await?;
        let entries = client.budget_comparison(self.month).await?;
        self.apply(&categories, &groups, &entries)
    }

    /// Overrides one category's budget for the shown month, then reloads.
    ///
    /// # Errors
    ///
    /// Returns the server's message; the board is not reloaded on failure.
    pub async fn set_budget(
        &mut self,
        client: &ApiClient,
        category_id: CategoryId,
        amount: Decimal,
    ) -> Result<bool, ClientError> {
        client
            .set_month_budget(self.month, category_id, amount)
            .await?;
        self.load(client).await
    }
}
