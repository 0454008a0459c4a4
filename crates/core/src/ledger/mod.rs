//! Transaction ledger: typed transactions, the visibility filter, display
//! signs and the ordering used when rows are inserted without a reload.

pub mod error;
pub mod service;
pub mod types;
pub mod validation;


pub use error::TransactionError;
pub use service::LedgerService;
pub use types::{
    FlowRole, RenderedRow, TransactionDraft, TransactionFilter, TransactionInput, TransactionPatch,
    TransactionRow, TransactionType,
};
pub use validation::{validate_new, validate_patch};
