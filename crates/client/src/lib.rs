//! Typed client for the Tally HTTP API.
//!
//! This crate provides:
//! - [`ApiClient`], one method per endpoint, reporting failures with the
//!   server's `{"error": ...}` message
//! - View state for the budget board, the ledger, the dashboard and inline
//!   budget edits, built on the same `tally-core` logic the server uses

pub mod client;
pub mod error;
pub mod views;

pub use client::{ApiClient, ImportOutcome};
pub use error::ClientError;
pub use views::{BudgetBoard, DashboardView, EditOutcome, InlineAmountEdit, LedgerView};
