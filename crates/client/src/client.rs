//! HTTP client for the Tally API.
//!
//! Every mutating call issues exactly one request. There are no retries; a
//! failed call surfaces the server's message and leaves it to the caller to
//! reload.

use reqwest::{Method, RequestBuilder, Response, multipart};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tally_core::budget::{ComparisonEntry, MonthlyCategory};
use tally_core::category::{
    Category, CategoryGroup, CategoryKind, CategoryType, KindFields, SortOrderUpdate,
};
use tally_core::dashboard::DashboardData;
use tally_core::fund::{FundInput, FundMovement, FundSummary};
use tally_core::ledger::{TransactionFilter, TransactionInput, TransactionRow};
use tally_shared::YearMonth;
use tally_shared::types::{CategoryGroupId, CategoryId, FundId, TransactionId};

use crate::error::{ClientError, error_message};

/// `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
struct Ack {
    message: String,
}

/// `{"id": ..., "message": ...}` returned by create endpoints.
#[derive(Debug, Clone, Deserialize)]
struct Created<T> {
    id: T,
}

/// `{"transaction": ...}` returned by transaction writes.
#[derive(Debug, Clone, Deserialize)]
struct SavedTransaction {
    transaction: TransactionRow,
}

/// `{"new_balance": ...}` returned by fund movements.
#[derive(Debug, Clone, Deserialize)]
struct Movement {
    new_balance: Decimal,
}

/// Result of a statement upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportOutcome {
    /// `Imported N transactions`.
    pub message: String,
    /// Number of transactions created.
    #[serde(default)]
    pub imported: usize,
    /// Merchants no keyword matched.
    #[serde(default)]
    pub unknown_merchants: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CategoryBody<'a> {
    name: &'a str,
    #[serde(flatten)]
    kind: KindFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_category: Option<&'a str>,
    default_budget: Decimal,
}

/// Client for one Tally server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (e.g. `http://127.0.0.1:8080`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Server base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/api{path}", self.base_url))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::debug!(status = status.as_u16(), %message, "API call failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        Ok(Self::send(builder).await?.json().await?)
    }

    async fn ack(builder: RequestBuilder) -> Result<String, ClientError> {
        Ok(Self::fetch::<Ack>(builder).await?.message)
    }

    // ========================================================================
    // Categories and groups
    // ========================================================================

    /// Lists categories, optionally of one type.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn categories(
        &self,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>, ClientError> {
        let mut builder = self.request(Method::GET, "/categories");
        if let Some(category_type) = category_type {
            builder = builder.query(&[("type", category_type.as_str())]);
        }
        Self::fetch(builder).await
    }

    /// Creates a category and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn create_category(
        &self,
        name: &str,
        kind: CategoryKind,
        parent_category: Option<&str>,
        default_budget: Decimal,
    ) -> Result<CategoryId, ClientError> {
        let body = CategoryBody {
            name,
            kind: kind.into(),
            parent_category,
            default_budget,
        };
        let created: Created<CategoryId> =
            Self::fetch(self.request(Method::POST, "/categories").json(&body)).await?;
        Ok(created.id)
    }

    /// Files a category under another group (`None` moves it to "Other").
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn move_category(
        &self,
        id: CategoryId,
        parent_category: Option<&str>,
    ) -> Result<String, ClientError> {
        let body = json!({ "parent_category": parent_category });
        Self::ack(self.request(Method::PUT, &format!("/categories/{id}")).json(&body)).await
    }

    /// Sets a category's default budget.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn set_default_budget(
        &self,
        id: CategoryId,
        amount: Decimal,
    ) -> Result<String, ClientError> {
        let body = json!({ "default_budget": amount });
        Self::ack(self.request(Method::PUT, &format!("/categories/{id}")).json(&body)).await
    }

    /// Applies new category sort orders.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn reorder_categories(&self, order: &[SortOrderUpdate]) -> Result<String, ClientError> {
        let body = json!({ "order": order });
        Self::ack(self.request(Method::POST, "/categories/reorder").json(&body)).await
    }

    /// Deletes a category with everything booked to it.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn delete_category(&self, id: CategoryId) -> Result<String, ClientError> {
        Self::ack(self.request(Method::DELETE, &format!("/categories/{id}"))).await
    }

    /// Lists groups, optionally of one type.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn category_groups(
        &self,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<CategoryGroup>, ClientError> {
        let mut builder = self.request(Method::GET, "/category-groups");
        if let Some(category_type) = category_type {
            builder = builder.query(&[("type", category_type.as_str())]);
        }
        Self::fetch(builder).await
    }

    /// Creates a group and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn create_group(
        &self,
        name: &str,
        kind: CategoryKind,
    ) -> Result<CategoryGroupId, ClientError> {
        let fields = KindFields::from(kind);
        let body = json!({
            "name": name,
            "type": fields.category_type,
            "is_deduction": fields.is_deduction,
        });
        let created: Created<CategoryGroupId> =
            Self::fetch(self.request(Method::POST, "/category-groups").json(&body)).await?;
        Ok(created.id)
    }

    // ========================================================================
    // Budgets
    // ========================================================================

    /// Categories with the budget in effect for `month`.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn month_budget(&self, month: YearMonth) -> Result<Vec<MonthlyCategory>, ClientError> {
        Self::fetch(self.request(Method::GET, &format!("/budget/{month}"))).await
    }

    /// Budget vs actual for `month`.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn budget_comparison(
        &self,
        month: YearMonth,
    ) -> Result<Vec<ComparisonEntry>, ClientError> {
        Self::fetch(self.request(Method::GET, &format!("/budget-comparison/{month}"))).await
    }

    /// Overrides one category's budget for `month` only.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn set_month_budget(
        &self,
        month: YearMonth,
        category_id: CategoryId,
        amount: Decimal,
    ) -> Result<String, ClientError> {
        let body = json!({ "category_id": category_id, "amount": amount });
        Self::ack(
            self.request(Method::POST, &format!("/budget/{month}/update"))
                .json(&body),
        )
        .await
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Transactions visible under `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRow>, ClientError> {
        Self::fetch(
            self.request(Method::GET, "/transactions")
                .query(&filter.to_query()),
        )
        .await
    }

    /// Books a transaction and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn create_transaction(
        &self,
        input: &TransactionInput,
    ) -> Result<TransactionRow, ClientError> {
        let saved: SavedTransaction =
            Self::fetch(self.request(Method::POST, "/transactions").json(input)).await?;
        Ok(saved.transaction)
    }

    /// Updates the supplied fields and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        input: &TransactionInput,
    ) -> Result<TransactionRow, ClientError> {
        let saved: SavedTransaction = Self::fetch(
            self.request(Method::PUT, &format!("/transactions/{id}"))
                .json(input),
        )
        .await?;
        Ok(saved.transaction)
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<String, ClientError> {
        Self::ack(self.request(Method::DELETE, &format!("/transactions/{id}"))).await
    }

    // ========================================================================
    // Funds
    // ========================================================================

    /// Every fund with its progress figures.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn funds(&self) -> Result<Vec<FundSummary>, ClientError> {
        Self::fetch(self.request(Method::GET, "/funds")).await
    }

    /// Creates a fund and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn create_fund(&self, input: &FundInput) -> Result<FundId, ClientError> {
        let created: Created<FundId> =
            Self::fetch(self.request(Method::POST, "/funds").json(input)).await?;
        Ok(created.id)
    }

    /// Adds money to a fund and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn contribute(&self, id: FundId, amount: Decimal) -> Result<Decimal, ClientError> {
        self.move_fund(id, "contribute", amount).await
    }

    /// Takes money out of a fund and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns the server's message (e.g. "Insufficient fund balance") on failure.
    pub async fn withdraw(&self, id: FundId, amount: Decimal) -> Result<Decimal, ClientError> {
        self.move_fund(id, "withdraw", amount).await
    }

    async fn move_fund(&self, id: FundId, action: &str, amount: Decimal) -> Result<Decimal, ClientError> {
        let body = FundMovement {
            amount: Some(json!(amount)),
            notes: None,
        };
        let movement: Movement = Self::fetch(
            self.request(Method::POST, &format!("/funds/{id}/{action}"))
                .json(&body),
        )
        .await?;
        Ok(movement.new_balance)
    }

    /// Recomputes every fund balance from the ledger.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn refresh_funds(&self) -> Result<String, ClientError> {
        Self::ack(self.request(Method::POST, "/funds/refresh")).await
    }

    // ========================================================================
    // Dashboard, import and export
    // ========================================================================

    /// Dashboard for `month`.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn dashboard(&self, month: YearMonth) -> Result<DashboardData, ClientError> {
        Self::fetch(self.request(Method::GET, &format!("/dashboard-data/{month}"))).await
    }

    /// Uploads a bank statement.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn import_csv(
        &self,
        filename: &str,
        contents: Vec<u8>,
    ) -> Result<ImportOutcome, ClientError> {
        let part = multipart::Part::bytes(contents)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);
        Self::fetch(self.request(Method::POST, "/import-csv").multipart(form)).await
    }

    /// Every transaction as CSV text.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn export_csv(&self) -> Result<String, ClientError> {
        Ok(Self::send(self.request(Method::GET, "/export/csv"))
            .await?
            .text()
            .await?)
    }

    /// Raw JSON of any GET endpoint, for reports without a typed wrapper.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        Self::fetch(self.request(Method::GET, path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://127.0.0.1:8080/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_category_body_wire_shape() {
        let body = CategoryBody {
            name: "401k",
            kind: CategoryKind::DEDUCTION.into(),
            parent_category: None,
            default_budget: Decimal::ONE_HUNDRED,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["is_deduction"], true);
        assert!(value.get("parent_category").is_none());
    }
}
