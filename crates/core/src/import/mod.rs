//! Bank statement import.
//!
//! Descriptions are parsed into merchants, merchants are matched against an
//! ordered keyword list, and the result is planned as a batch of transactions.

mod categorizer;
mod error;
mod parser;
mod statement;

#[cfg(test)]
mod tests;

pub use categorizer::{DEFAULT_KEYWORDS, KeywordCategorizer, UNCATEGORIZED, validate_keyword};
pub use error::ImportError;
pub use parser::{ParsedDescription, parse_description};
pub use statement::{
    ImportPlan, PlannedTransaction, StatementRow, decode_upload, parse_statement_amount,
    parse_statement_date, plan_import, read_statement, validate_upload,
};
