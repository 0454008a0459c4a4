//! Repository layer for data access.
//!
//! Each repository wraps a database connection and maps between `SeaORM`
//! models and the domain types of `tally-core`.

pub mod budget;
pub mod category;
pub mod fund;
pub mod keyword;
pub mod settings;
pub mod transaction;

pub use budget::{BudgetRepoError, BudgetRepository};
pub use category::{CategoryRepoError, CategoryRepository};
pub use fund::{FundRepoError, FundRepository, SAVINGS_GROUP};
pub use keyword::KeywordRepository;
pub use settings::{SELECTED_MONTH, SettingsRepository};
pub use transaction::{TransactionRepoError, TransactionRepository};
