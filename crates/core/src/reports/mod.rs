//! Financial reports computed from ledger transactions.
//!
//! - Monthly summary
//! - Annual overview
//! - Category analysis
//! - Spending trends and period comparison
//! - Fund progress
//! - Sankey flow graph

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
