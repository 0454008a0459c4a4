//! Budget vs actual aggregation.
//!
//! Joins each category's budget for a month with its actual transaction total
//! and rolls the results up into category groups. Salary income is the one
//! kind where exceeding the target is good; every other kind (expense, fund,
//! deduction) is good when it stays at or under budget.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    BudgetFigures, BudgetRow, BudgetStatus, ComparisonEntry, GroupBudget, MonthlyCategory,
    Progress,
};
