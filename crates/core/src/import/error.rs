//! Import error types.

use thiserror::Error;

/// Errors raised while importing a bank statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// Upload had no `file` part.
    #[error("No file provided")]
    NoFile,

    /// Upload had an empty file name.
    #[error("No file selected")]
    NoFileSelected,

    /// File is not a `.csv`.
    #[error("Invalid file format")]
    InvalidFormat,

    /// File is not UTF-8 text.
    #[error("File must be UTF-8 text")]
    Encoding,

    /// A headerless row has fewer than two columns.
    #[error("CSV must have at least two columns")]
    TooFewColumns,

    /// An amount cell is not a number.
    #[error("Invalid amount on row {row}: {value}")]
    InvalidAmount {
        /// 1-based row number in the file.
        row: usize,
        /// Offending cell.
        value: String,
    },

    /// The CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Keyword mapping without keyword or category.
    #[error("keyword and category required")]
    KeywordFieldsRequired,
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}
