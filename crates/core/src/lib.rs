//! Core budgeting logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `category` - Category kinds, groups and display sections
//! - `budget` - Budget vs actual comparison and group roll-ups
//! - `summary` - Money-to-budget totals for the budget board
//! - `ledger` - Transactions, filters and display signs
//! - `fund` - Savings fund progress and balance effects
//! - `dashboard` - Monthly and annual dashboard totals
//! - `reports` - Monthly, annual, trend, comparison and cash flow reports
//! - `import` - Bank statement parsing and keyword categorization
//! - `export` - CSV and JSON exports
//! - `money` - Checked sums and ratios over amounts

pub mod budget;
pub mod category;
pub mod dashboard;
pub mod export;
pub mod fund;
pub mod import;
pub mod ledger;
pub mod money;
pub mod reports;
pub mod summary;
pub mod validation;
