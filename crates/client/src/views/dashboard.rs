//! Dashboard view with the compact fund list.

use tally_core::dashboard::DashboardData;
use tally_core::fund::{FundPreview, FundService, PREVIEW_LIMIT};
use tally_shared::YearMonth;

use crate::client::ApiClient;
use crate::error::ClientError;

/// Dashboard for one month.
#[derive(Debug, Clone)]
pub struct DashboardView {
    month: YearMonth,
    data: Option<DashboardData>,
}

impl DashboardView {
    /// Dashboard for `month`, not loaded yet.
    #[must_use]
    pub const fn new(month: YearMonth) -> Self {
        Self { month, data: None }
    }

    /// Loaded data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    /// Replaces the shown data.
    pub fn replace(&mut self, data: DashboardData) {
        self.data = Some(data);
    }

    /// First funds plus the `+K more` count.
    #[must_use]
    pub fn fund_preview(&self) -> FundPreview<'_> {
        let funds = self.data.as_ref().map_or(&[][..], |data| data.funds.as_slice());
        FundService::preview(funds, PREVIEW_LIMIT)
    }

    /// Fetches the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the server's message; previously loaded data is kept.
    pub async fn load(&mut self, client: &ApiClient) -> Result<(), ClientError> {
        let data = client.dashboard(self.month).await?;
        self.replace(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_before_load_is_empty() {
        let view = DashboardView::new("2024-03".parse().unwrap());
        let preview = view.fund_preview();
        assert!(preview.shown.is_empty());
        assert_eq!(preview.more_label(), None);
    }
}
