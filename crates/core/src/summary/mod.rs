//! Month summary: bucket totals, money left to budget and the income-target
//! notification latch.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{IncomeTargetLatch, SummaryService};
pub use types::{BucketTotals, BudgetSummary};
