//! Monthly budget repository: per-month overrides and budget vs actual.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tally_core::budget::{BudgetError, BudgetService, ComparisonEntry, MonthlyCategory};
use tally_core::export::ExportBudget;
use tally_shared::types::{CategoryId, YearMonth};

use super::category::parse_kind;
use super::transaction::parse_transaction_type;
use crate::entities::{budget_overrides, categories, transactions};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetRepoError {
    /// Domain rule violation.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn overrides_for(&self, month: YearMonth) -> Result<HashMap<i32, Decimal>, DbErr> {
        let rows: Vec<(i32, Decimal)> = budget_overrides::Entity::find()
            .select_only()
            .column(budget_overrides::Column::CategoryId)
            .column(budget_overrides::Column::Amount)
            .filter(budget_overrides::Column::Month.eq(month.to_string()))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Every category with its budget resolved for `month`.
    ///
    /// Ordered by sort order then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn monthly_categories(
        &self,
        month: YearMonth,
    ) -> Result<Vec<MonthlyCategory>, BudgetRepoError> {
        let overrides = self.overrides_for(month).await?;
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::SortOrder)
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?;

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            let month_override = overrides.get(&model.id).copied();
            rows.push(MonthlyCategory {
                id: CategoryId::new(model.id),
                kind: parse_kind(&model.kind)?,
                name: model.name,
                parent_category: model.parent_category,
                sort_order: model.sort_order,
                default_budget: model.default_budget,
                monthly_budget: BudgetService::resolve_monthly_budget(
                    model.default_budget,
                    month_override,
                ),
                is_override: month_override.is_some(),
            });
        }
        Ok(rows)
    }

    /// Sets the budget of one category for one month.
    ///
    /// Only the month override is written; the category's default budget is
    /// left as it is.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::CategoryNotFound` if the category does not exist.
    pub async fn set_month_override(
        &self,
        month: YearMonth,
        category_id: CategoryId,
        amount: Decimal,
    ) -> Result<(), BudgetRepoError> {
        let exists = categories::Entity::find_by_id(category_id.into_inner())
            .one(&self.db)
            .await?
            .is_some();
        if !exists {
            return Err(BudgetError::CategoryNotFound(category_id).into());
        }

        let existing = budget_overrides::Entity::find()
            .filter(budget_overrides::Column::Month.eq(month.to_string()))
            .filter(budget_overrides::Column::CategoryId.eq(category_id.into_inner()))
            .one(&self.db)
            .await?;
        match existing {
            Some(model) => {
                let mut active: budget_overrides::ActiveModel = model.into();
                active.amount = Set(amount);
                active.update(&self.db).await?;
            }
            None => {
                budget_overrides::ActiveModel {
                    month: Set(month.to_string()),
                    category_id: Set(category_id.into_inner()),
                    amount: Set(amount),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
            }
        }

        tracing::info!(%month, category_id = %category_id, amount = %amount, "Budget override set");
        Ok(())
    }

    /// Budget vs actual for every category in `month`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn comparison(
        &self,
        month: YearMonth,
    ) -> Result<Vec<ComparisonEntry>, BudgetRepoError> {
        let categories = self.monthly_categories(month).await?;
        let (start, end) = month.date_range();
        let rows: Vec<(i32, String, Decimal)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::CategoryId)
            .column(transactions::Column::TransactionType)
            .column(transactions::Column::Amount)
            .filter(transactions::Column::Date.gte(start))
            .filter(transactions::Column::Date.lt(end))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut by_category: HashMap<i32, Vec<_>> = HashMap::new();
        for (category_id, tx_type, amount) in rows {
            by_category
                .entry(category_id)
                .or_default()
                .push((parse_transaction_type(&tx_type)?, amount));
        }

        categories
            .iter()
            .map(|category| -> Result<ComparisonEntry, BudgetRepoError> {
                let movements = by_category
                    .get(&category.id.into_inner())
                    .cloned()
                    .unwrap_or_default();
                let actual = BudgetService::actual_from(category.kind, movements)
                    .map_err(BudgetError::from)?;
                let entry = BudgetService::compare(category, actual).map_err(BudgetError::from)?;
                Ok(entry)
            })
            .collect()
    }

    /// Every month override, for export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_overrides(&self) -> Result<Vec<ExportBudget>, BudgetRepoError> {
        let pairs = budget_overrides::Entity::find()
            .find_also_related(categories::Entity)
            .order_by_asc(budget_overrides::Column::Month)
            .order_by_asc(budget_overrides::Column::Id)
            .all(&self.db)
            .await?;
        Ok(pairs
            .into_iter()
            .filter_map(|(budget, category)| {
                category.map(|category| ExportBudget {
                    month: budget.month,
                    category: category.name,
                    amount: budget.amount,
                })
            })
            .collect())
    }
}
