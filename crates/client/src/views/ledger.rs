//! Transaction ledger with optimistic reconciliation.

use tally_core::ledger::{LedgerService, RenderedRow, TransactionFilter, TransactionInput, TransactionRow};
use tally_shared::types::TransactionId;

use crate::client::ApiClient;
use crate::error::ClientError;

/// Rows currently shown in the ledger and the filter that produced them.
#[derive(Debug, Clone, Default)]
pub struct LedgerView {
    filter: TransactionFilter,
    rows: Vec<RenderedRow>,
}

impl LedgerView {
    /// Empty ledger showing `filter`.
    #[must_use]
    pub fn new(filter: TransactionFilter) -> Self {
        Self {
            filter,
            rows: Vec::new(),
        }
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> &TransactionFilter {
        &self.filter
    }

    /// Rows newest first.
    #[must_use]
    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    /// Replaces the filter; the next [`load`](Self::load) applies it.
    pub fn set_filter(&mut self, filter: TransactionFilter) {
        self.filter = filter;
    }

    /// Replaces the rows with a fresh listing.
    pub fn replace(&mut self, rows: &[TransactionRow]) {
        self.rows = LedgerService::render_all(rows, &self.filter);
    }

    /// Patches the rows with a transaction the server just stored.
    ///
    /// Returns whether the transaction is visible under the current filter.
    pub fn apply_saved(&mut self, saved: &TransactionRow) -> bool {
        LedgerService::reconcile(&mut self.rows, saved, &self.filter)
    }

    /// Drops a deleted transaction from the rows.
    pub fn apply_deleted(&mut self, id: TransactionId) {
        self.rows.retain(|row| row.id != id);
    }

    /// Fetches the filtered listing.
    ///
    /// # Errors
    ///
    /// Returns the server's message; the rows are left as they were.
    pub async fn load(&mut self, client: &ApiClient) -> Result<(), ClientError> {
        let rows = client.transactions(&self.filter).await?;
        self.replace(&rows);
        Ok(())
    }

    /// Books a transaction and shows it if the filter allows.
    ///
    /// # Errors
    ///
    /// Returns the server's message; nothing is shown on failure.
    pub async fn create(
        &mut self,
        client: &ApiClient,
        input: &TransactionInput,
    ) -> Result<TransactionRow, ClientError> {
        let saved = client.create_transaction(input).await?;
        self.apply_saved(&saved);
        Ok(saved)
    }

    /// Updates a transaction and moves or hides its row accordingly.
    ///
    /// # Errors
    ///
    /// Returns the server's message; the row is left untouched on failure.
    pub async fn update(
        &mut self,
        client: &ApiClient,
        id: TransactionId,
        input: &TransactionInput,
    ) -> Result<TransactionRow, ClientError> {
        let saved = client.update_transaction(id, input).await?;
        self.apply_saved(&saved);
        Ok(saved)
    }

    /// Deletes a transaction and drops its row.
    ///
    /// # Errors
    ///
    /// Returns the server's message; the row stays on failure.
    pub async fn remove(&mut self, client: &ApiClient, id: TransactionId) -> Result<(), ClientError> {
        client.delete_transaction(id).await?;
        self.apply_deleted(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_core::category::CategoryKind;
    use tally_core::ledger::TransactionType;
    use tally_shared::types::CategoryId;

    fn row(id: i32, day: u32, tx_type: TransactionType, amount: Decimal) -> TransactionRow {
        TransactionRow {
            id: TransactionId::new(id),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            transaction_type: tx_type,
            amount,
            category_id: CategoryId::new(1),
            category: "Groceries".to_string(),
            category_kind: CategoryKind::Expense,
            parent_category: None,
            description: format!("row {id}"),
            merchant: String::new(),
            notes: String::new(),
        }
    }

    fn march() -> TransactionFilter {
        TransactionFilter {
            month: Some("2024-03".parse().unwrap()),
            ..TransactionFilter::default()
        }
    }

    fn ids(view: &LedgerView) -> Vec<i32> {
        view.rows().iter().map(|r| r.id.into_inner()).collect()
    }

    #[test]
    fn test_replace_sorts_newest_first() {
        let mut view = LedgerView::new(march());
        view.replace(&[
            row(1, 5, TransactionType::Expense, dec!(10)),
            row(2, 20, TransactionType::Expense, dec!(20)),
            row(3, 12, TransactionType::Income, dec!(30)),
        ]);
        assert_eq!(ids(&view), vec![2, 3, 1]);
        assert_eq!(view.rows()[0].amount_label, "-$20.00");
        assert_eq!(view.rows()[1].amount_label, "$30.00");
    }

    #[test]
    fn test_saved_row_is_placed_by_date() {
        let mut view = LedgerView::new(march());
        view.replace(&[
            row(1, 20, TransactionType::Expense, dec!(10)),
            row(2, 10, TransactionType::Expense, dec!(10)),
        ]);
        assert!(view.apply_saved(&row(3, 10, TransactionType::Expense, dec!(5))));
        assert_eq!(ids(&view), vec![1, 3, 2]);
    }

    #[test]
    fn test_update_moving_out_of_month_hides_row() {
        let mut view = LedgerView::new(march());
        view.replace(&[row(1, 20, TransactionType::Expense, dec!(10))]);

        let mut moved = row(1, 20, TransactionType::Expense, dec!(10));
        moved.date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        assert!(!view.apply_saved(&moved));
        assert!(view.rows().is_empty());
    }

    #[test]
    fn test_apply_deleted() {
        let mut view = LedgerView::new(TransactionFilter::default());
        view.replace(&[
            row(1, 20, TransactionType::Expense, dec!(10)),
            row(2, 10, TransactionType::Expense, dec!(10)),
        ]);
        view.apply_deleted(TransactionId::new(1));
        assert_eq!(ids(&view), vec![2]);
    }
}
