//! CSV and JSON export writers.

use chrono::{NaiveDate, NaiveDateTime};

use super::error::ExportError;
use super::types::{ExportBudget, ExportBundle, ExportCategory, ExportFund, ExportTransaction};
use crate::category::Category;
use crate::fund::Fund;
use crate::ledger::TransactionRow;

/// Column headers of the transaction CSV.
pub const CSV_HEADERS: [&str; 7] = [
    "Date",
    "Type",
    "Category",
    "Description",
    "Merchant",
    "Amount",
    "Notes",
];

/// Export service.
pub struct ExportService;

impl ExportService {
    /// `budget_transactions_YYYYMMDD.csv`.
    #[must_use]
    pub fn csv_filename(today: NaiveDate) -> String {
        format!("budget_transactions_{}.csv", today.format("%Y%m%d"))
    }

    /// `budget_data_YYYYMMDD.json`.
    #[must_use]
    pub fn json_filename(today: NaiveDate) -> String {
        format!("budget_data_{}.json", today.format("%Y%m%d"))
    }

    /// Writes transactions as CSV, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn transactions_csv(rows: &[TransactionRow]) -> Result<String, ExportError> {
        let mut sorted: Vec<&TransactionRow> = rows.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADERS)?;
        for row in sorted {
            writer.write_record([
                row.date.to_string(),
                row.transaction_type.to_string(),
                row.category.clone(),
                row.description.clone(),
                row.merchant.clone(),
                row.amount.to_string(),
                row.notes.clone(),
            ])?;
        }
        let bytes = writer.into_inner()?;
        String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
    }

    /// Assembles the full JSON export.
    #[must_use]
    pub fn bundle(
        exported_at: NaiveDateTime,
        categories: &[Category],
        transactions: &[TransactionRow],
        funds: &[Fund],
        budgets: Vec<ExportBudget>,
    ) -> ExportBundle {
        ExportBundle {
            export_date: exported_at,
            categories: categories.iter().map(ExportCategory::from).collect(),
            transactions: transactions.iter().map(ExportTransaction::from).collect(),
            funds: funds.iter().map(ExportFund::from).collect(),
            budgets,
        }
    }

    /// Pretty-printed JSON of a bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn bundle_json(bundle: &ExportBundle) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(bundle)?)
    }
}
