//! Transaction CSV and full-data JSON exports.

pub mod error;
pub mod service;
pub mod types;

pub use error::ExportError;
pub use service::{CSV_HEADERS, ExportService};
pub use types::{ExportBudget, ExportBundle, ExportCategory, ExportFund, ExportTransaction};
