//! Bank statement CSV reading and import planning.
//!
//! Two layouts are accepted: the headerless `raw, amount` export, where the
//! date is recovered from the description, and files with a header row whose
//! date, description and amount columns are located by name.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::categorizer::KeywordCategorizer;
use super::error::ImportError;
use super::parser::{ParsedDescription, parse_description};
use crate::ledger::TransactionType;
use crate::validation::MAX_AMOUNT;

/// One statement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRow {
    /// 1-based row number in the file.
    pub row: usize,
    /// Raw description.
    pub raw: String,
    /// Parsed description.
    pub parsed: ParsedDescription,
    /// Booking date, if one could be read.
    pub date: Option<NaiveDate>,
    /// Signed amount; negative is money out.
    pub amount: Decimal,
}

/// A transaction to create from a statement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTransaction {
    /// Booking date.
    pub date: NaiveDate,
    /// `expense` for money out, `income` otherwise.
    pub transaction_type: TransactionType,
    /// Absolute amount.
    pub amount: Decimal,
    /// Guessed category name.
    pub category: String,
    /// Merchant (also used as the description).
    pub merchant: String,
}

/// Result of planning an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlan {
    /// Transactions to create, in file order.
    pub transactions: Vec<PlannedTransaction>,
    /// Merchants no keyword matched, first occurrence order.
    pub unknown_merchants: Vec<String>,
    /// Rows skipped for lack of a date.
    pub skipped: usize,
}

impl ImportPlan {
    /// Distinct category names used by the plan, first occurrence order.
    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for tx in &self.transactions {
            if !names.contains(&tx.category.as_str()) {
                names.push(&tx.category);
            }
        }
        names
    }
}

/// Column positions of a statement with a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderColumns {
    date: usize,
    description: usize,
    amount: usize,
}

impl HeaderColumns {
    /// Recognizes a header row by its cell names.
    fn detect(cells: &[String]) -> Option<Self> {
        let lower: Vec<String> = cells.iter().map(|c| c.trim().to_lowercase()).collect();
        let find = |needles: &[&str]| {
            needles
                .iter()
                .find_map(|needle| lower.iter().position(|cell| cell.contains(needle)))
        };
        let date = find(&["date"])?;
        let amount = find(&["amount"]);
        let description = find(&["action", "description", "details", "memo", "payee"]);
        if amount.is_none() && description.is_none() {
            return None;
        }
        Some(Self {
            date,
            amount: amount.or_else(|| find(&["debit", "credit"]))?,
            description: description.unwrap_or(date),
        })
    }
}

/// Picks `;` when the first non-blank line uses it and has no commas.
fn sniff_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    if first.contains(';') && !first.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Parses an amount cell, ignoring `$`, thousands separators and spaces.
///
/// A parenthesized amount is negative. The value is rounded to cents and
/// `None` when its magnitude exceeds [`MAX_AMOUNT`].
#[must_use]
pub fn parse_statement_amount(cell: &str) -> Option<Decimal> {
    let cleaned: String = cell
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    let (negative, digits) = match cleaned.strip_prefix('(').and_then(|c| c.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };
    let value = Decimal::from_str(digits)
        .or_else(|_| Decimal::from_scientific(digits))
        .ok()?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if value.abs() > MAX_AMOUNT {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parses a statement date: `MM/DD/YYYY`, `MM/DD/YY`, `MM/DD` (in `today`'s
/// year) or `YYYY-MM-DD`.
#[must_use]
pub fn parse_statement_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    let parts: Vec<&str> = text.split('/').collect();
    match parts.as_slice() {
        [_, _, year] if year.len() == 4 => NaiveDate::parse_from_str(text, "%m/%d/%Y").ok(),
        [_, _, year] if year.len() == 2 => NaiveDate::parse_from_str(text, "%m/%d/%y").ok(),
        [month, day] => {
            NaiveDate::from_ymd_opt(today.year(), month.parse().ok()?, day.parse().ok()?)
        }
        _ => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok(),
    }
}

/// Reads statement rows from CSV text. Blank rows are skipped.
///
/// # Errors
///
/// Returns an error for malformed CSV, a headerless row with fewer than two
/// columns, or an amount that is not a number.
pub fn read_statement(text: &str, today: NaiveDate) -> Result<Vec<StatementRow>, ImportError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(text))
        .from_reader(text.as_bytes());

    let mut header: Option<Option<HeaderColumns>> = None;
    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let row = index + 1;

        let columns = match header {
            Some(columns) => columns,
            None => {
                let detected = HeaderColumns::detect(&cells);
                header = Some(detected);
                if detected.is_some() {
                    continue;
                }
                None
            }
        };

        let cell = |i: usize| cells.get(i).map_or("", String::as_str);
        let (raw, amount_cell, date_cell) = match columns {
            Some(columns) => (cell(columns.description), cell(columns.amount), Some(cell(columns.date))),
            None if cells.len() < 2 => return Err(ImportError::TooFewColumns),
            None => (cell(0), cell(1), None),
        };

        let amount = parse_statement_amount(amount_cell).ok_or_else(|| ImportError::InvalidAmount {
            row,
            value: amount_cell.to_string(),
        })?;
        let parsed = parse_description(raw);
        let date = date_cell
            .or(parsed.date.as_deref())
            .and_then(|d| parse_statement_date(d, today));

        rows.push(StatementRow {
            row,
            raw: raw.to_string(),
            parsed,
            date,
            amount,
        });
    }
    Ok(rows)
}

/// Turns statement rows into transactions to create.
#[must_use]
pub fn plan_import(rows: &[StatementRow], categorizer: &KeywordCategorizer) -> ImportPlan {
    let mut plan = ImportPlan::default();
    for row in rows {
        let merchant = row.parsed.merchant.clone();
        let category = match categorizer.categorize(&merchant) {
            Some(category) => category.to_string(),
            None => {
                let trimmed = merchant.trim();
                if !trimmed.is_empty() && !plan.unknown_merchants.iter().any(|m| m == trimmed) {
                    plan.unknown_merchants.push(trimmed.to_string());
                }
                super::categorizer::UNCATEGORIZED.to_string()
            }
        };
        let Some(date) = row.date else {
            plan.skipped += 1;
            continue;
        };
        plan.transactions.push(PlannedTransaction {
            date,
            transaction_type: if row.amount.is_sign_negative() && !row.amount.is_zero() {
                TransactionType::Expense
            } else {
                TransactionType::Income
            },
            amount: row.amount.abs(),
            category,
            merchant,
        });
    }
    plan
}

/// Checks the uploaded file name: present, non-empty and ending in `.csv`.
///
/// # Errors
///
/// Returns `NoFile`, `NoFileSelected` or `InvalidFormat`.
pub fn validate_upload(filename: Option<&str>) -> Result<(), ImportError> {
    let name = filename.ok_or(ImportError::NoFile)?;
    if name.trim().is_empty() {
        return Err(ImportError::NoFileSelected);
    }
    if !name.to_lowercase().ends_with(".csv") {
        return Err(ImportError::InvalidFormat);
    }
    Ok(())
}

/// Decodes uploaded bytes as UTF-8 text.
///
/// # Errors
///
/// Returns `ImportError::Encoding` for anything else.
pub fn decode_upload(bytes: &[u8]) -> Result<&str, ImportError> {
    std::str::from_utf8(bytes).map_err(|_| ImportError::Encoding)
}
