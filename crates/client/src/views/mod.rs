//! Client-side view state.
//!
//! Each view owns the data one screen shows and knows how to refresh it from
//! an [`ApiClient`](crate::ApiClient). Computation is delegated to
//! `tally-core` so the client and the server never disagree on a figure.

mod budget_board;
mod dashboard;
mod inline_edit;
mod ledger;

pub use budget_board::BudgetBoard;
pub use dashboard::DashboardView;
pub use inline_edit::{EditOutcome, InlineAmountEdit};
pub use ledger::LedgerView;
