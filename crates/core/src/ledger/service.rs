//! Ledger service: display classification, ordering and optimistic reconciliation.
//!
//! The list endpoint and the client's post-save reconciliation both go through
//! [`LedgerService::classify_and_format`], so a row rendered after an edit is
//! indistinguishable from the same row rendered on a full reload.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{RenderedRow, TransactionFilter, TransactionRow};

/// Ledger service for business logic.
pub struct LedgerService;

impl LedgerService {
    /// Amount with its display sign: outflows are negative.
    #[must_use]
    pub fn signed_amount(row: &TransactionRow) -> Decimal {
        if row.is_outflow() {
            -row.amount
        } else {
            row.amount
        }
    }

    /// Formats a signed amount as currency, e.g. `-$12.50`.
    #[must_use]
    pub fn format_amount(amount: Decimal) -> String {
        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}${:.2}", amount.abs())
    }

    /// Renders a row without applying any filter.
    #[must_use]
    pub fn render(row: &TransactionRow) -> RenderedRow {
        let signed_amount = Self::signed_amount(row);
        RenderedRow {
            id: row.id,
            date: row.date,
            transaction_type: row.transaction_type,
            category: row.category.clone(),
            description: row.description.clone(),
            merchant: row.merchant.clone(),
            notes: row.notes.clone(),
            signed_amount,
            amount_label: Self::format_amount(signed_amount),
            is_outflow: row.is_outflow(),
        }
    }

    /// Renders a row if it is visible under `filter`.
    #[must_use]
    pub fn classify_and_format(row: &TransactionRow, filter: &TransactionFilter) -> Option<RenderedRow> {
        filter.matches(row).then(|| Self::render(row))
    }

    /// Renders every visible row, most recent first.
    #[must_use]
    pub fn render_all(rows: &[TransactionRow], filter: &TransactionFilter) -> Vec<RenderedRow> {
        let mut rendered: Vec<RenderedRow> = rows
            .iter()
            .filter_map(|row| Self::classify_and_format(row, filter))
            .collect();
        Self::sort_newest_first(&mut rendered);
        rendered
    }

    /// Stable sort by date descending; rows on the same date keep their order.
    pub fn sort_newest_first(rows: &mut [RenderedRow]) {
        rows.sort_by(|a, b| b.date.cmp(&a.date));
    }

    /// Index at which a row dated `date` is inserted: before the first row
    /// whose date is not strictly greater, else at the end.
    #[must_use]
    pub fn insert_position(rows: &[RenderedRow], date: NaiveDate) -> usize {
        rows.iter()
            .position(|existing| existing.date <= date)
            .unwrap_or(rows.len())
    }

    /// Patches a displayed list after a create or update without reloading.
    ///
    /// Any previous rendering of the same transaction is removed; the new one is
    /// inserted only if it is still visible. Returns whether it was inserted.
    pub fn reconcile(
        rows: &mut Vec<RenderedRow>,
        saved: &TransactionRow,
        filter: &TransactionFilter,
    ) -> bool {
        rows.retain(|existing| existing.id != saved.id);
        match Self::classify_and_format(saved, filter) {
            Some(rendered) => {
                let at = Self::insert_position(rows, rendered.date);
                rows.insert(at, rendered);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryKind;
    use crate::ledger::types::TransactionType;
    use rust_decimal_macros::dec;
    use tally_shared::YearMonth;
    use tally_shared::types::{CategoryId, TransactionId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(id: i32, day: NaiveDate, tx_type: TransactionType, kind: CategoryKind) -> TransactionRow {
        TransactionRow {
            id: TransactionId::new(id),
            date: day,
            transaction_type: tx_type,
            amount: dec!(12.5),
            category_id: CategoryId::new(1),
            category: "Groceries".to_string(),
            category_kind: kind,
            parent_category: Some("Food".to_string()),
            description: "Weekly shop".to_string(),
            merchant: "KROGER".to_string(),
            notes: String::new(),
        }
    }

    fn march() -> TransactionFilter {
        TransactionFilter {
            month: YearMonth::new(2024, 3),
            ..TransactionFilter::default()
        }
    }

    #[test]
    fn test_month_filter_is_a_calendar_match() {
        let tx = row(1, date(2024, 3, 15), TransactionType::Expense, CategoryKind::Expense);
        assert!(LedgerService::classify_and_format(&tx, &march()).is_some());

        let april = TransactionFilter {
            month: YearMonth::new(2024, 4),
            ..TransactionFilter::default()
        };
        assert!(LedgerService::classify_and_format(&tx, &april).is_none());
    }

    #[test]
    fn test_search_covers_description_merchant_and_notes() {
        let mut tx = row(1, date(2024, 3, 15), TransactionType::Expense, CategoryKind::Expense);
        tx.notes = "Split with Sam".to_string();
        for needle in ["weekly", "kroger", "SAM"] {
            let filter = TransactionFilter {
                search: Some(needle.to_string()),
                ..TransactionFilter::default()
            };
            assert!(filter.matches(&tx), "{needle} should match");
        }
        let miss = TransactionFilter {
            search: Some("rent".to_string()),
            ..TransactionFilter::default()
        };
        assert!(!miss.matches(&tx));
    }

    #[test]
    fn test_type_and_category_filters() {
        let tx = row(1, date(2024, 3, 15), TransactionType::Expense, CategoryKind::Expense);
        let wrong_type = TransactionFilter {
            transaction_type: Some(TransactionType::Income),
            ..TransactionFilter::default()
        };
        let wrong_category = TransactionFilter {
            category_id: Some(CategoryId::new(2)),
            ..TransactionFilter::default()
        };
        assert!(!wrong_type.matches(&tx));
        assert!(!wrong_category.matches(&tx));
    }

    #[test]
    fn test_sign_rules() {
        let day = date(2024, 3, 1);
        let cases = [
            (TransactionType::Income, CategoryKind::SALARY, "$12.50"),
            (TransactionType::Income, CategoryKind::DEDUCTION, "-$12.50"),
            (TransactionType::Expense, CategoryKind::Expense, "-$12.50"),
            (TransactionType::FundContribution, CategoryKind::Fund, "$12.50"),
            (TransactionType::FundWithdrawal, CategoryKind::Fund, "-$12.50"),
        ];
        for (tx_type, kind, label) in cases {
            let rendered = LedgerService::render(&row(1, day, tx_type, kind));
            assert_eq!(rendered.amount_label, label, "{tx_type} in {kind}");
        }
    }

    #[test]
    fn test_render_all_sorts_newest_first() {
        let rows = vec![
            row(1, date(2024, 3, 2), TransactionType::Expense, CategoryKind::Expense),
            row(2, date(2024, 3, 20), TransactionType::Expense, CategoryKind::Expense),
            row(3, date(2024, 2, 28), TransactionType::Expense, CategoryKind::Expense),
            row(4, date(2024, 3, 9), TransactionType::Expense, CategoryKind::Expense),
        ];
        let ids: Vec<i32> = LedgerService::render_all(&rows, &march())
            .iter()
            .map(|r| r.id.into_inner())
            .collect();
        assert_eq!(ids, vec![2, 4, 1]);
    }

    #[test]
    fn test_insert_position_goes_before_first_not_greater() {
        let rows: Vec<RenderedRow> = [20, 15, 15, 3]
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                LedgerService::render(&row(
                    i32::try_from(i).unwrap(),
                    date(2024, 3, d),
                    TransactionType::Expense,
                    CategoryKind::Expense,
                ))
            })
            .collect();
        assert_eq!(LedgerService::insert_position(&rows, date(2024, 3, 15)), 1);
        assert_eq!(LedgerService::insert_position(&rows, date(2024, 3, 31)), 0);
        assert_eq!(LedgerService::insert_position(&rows, date(2024, 3, 1)), 4);
    }

    #[test]
    fn test_reconcile_moves_and_drops_rows() {
        let filter = march();
        let mut rows = LedgerService::render_all(
            &[
                row(1, date(2024, 3, 20), TransactionType::Expense, CategoryKind::Expense),
                row(2, date(2024, 3, 10), TransactionType::Expense, CategoryKind::Expense),
            ],
            &filter,
        );

        let moved = row(1, date(2024, 3, 5), TransactionType::Expense, CategoryKind::Expense);
        assert!(LedgerService::reconcile(&mut rows, &moved, &filter));
        let ids: Vec<i32> = rows.iter().map(|r| r.id.into_inner()).collect();
        assert_eq!(ids, vec![2, 1]);

        let out_of_month = row(2, date(2024, 4, 1), TransactionType::Expense, CategoryKind::Expense);
        assert!(!LedgerService::reconcile(&mut rows, &out_of_month, &filter));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_filter_from_params_ignores_blanks() {
        let filter = TransactionFilter::from_params(Some(""), Some("expense"), Some(" "), None).unwrap();
        assert_eq!(filter.month, None);
        assert_eq!(filter.transaction_type, Some(TransactionType::Expense));
        assert_eq!(filter.category_id, None);
        assert!(TransactionFilter::from_params(Some("2024-13"), None, None, None).is_err());
        assert!(TransactionFilter::from_params(None, Some("refund"), None, None).is_err());
    }

    #[test]
    fn test_row_wire_shape() {
        let tx = row(5, date(2024, 3, 15), TransactionType::Income, CategoryKind::DEDUCTION);
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["category_type"], "deduction");
        assert_eq!(value["date"], "2024-03-15");
        let back: TransactionRow = serde_json::from_value(value).unwrap();
        assert_eq!(back, tx);
    }
}
