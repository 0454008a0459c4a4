//! Savings funds: goal progress, recommended contributions and the balance
//! effects of transactions booked to a fund's category.

pub mod error;
pub mod service;
pub mod types;


pub use error::FundError;
pub use service::{FundService, PREVIEW_LIMIT};
pub use types::{
    BalanceEffect, Fund, FundInput, FundMovement, FundPatch, FundPreview, FundSummary, NewFund,
};
