//! Dashboard: headline totals, funds and recent activity for a month or year.

pub mod service;
pub mod types;

pub use service::{DashboardService, RECENT_LIMIT};
pub use types::{DashboardData, DashboardTotals};
