//! Fund repository.
//!
//! Every fund owns a fund-kind category of the same name; the two are created,
//! renamed and deleted together.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tally_core::category::CategoryKind;
use tally_core::fund::{Fund, FundError, FundPatch, FundService, NewFund};
use tally_core::ledger::{TransactionDraft, TransactionType};
use tally_shared::types::{CategoryId, FundId};

use super::category::next_category_sort_order;
use super::transaction::{insert_row, parse_transaction_type};
use crate::entities::{budget_overrides, categories, category_groups, funds, transactions};

/// Group that fund categories are filed under.
pub const SAVINGS_GROUP: &str = "Savings";

/// Error types for fund operations.
#[derive(Debug, thiserror::Error)]
pub enum FundRepoError {
    /// Domain rule violation.
    #[error(transparent)]
    Fund(#[from] FundError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub(crate) fn fund_from_model(model: funds::Model) -> Fund {
    Fund {
        id: FundId::new(model.id),
        name: model.name,
        goal: model.goal,
        goal_date: model.goal_date,
        balance: model.current_balance,
        monthly_contribution: model.monthly_contribution,
    }
}

async fn fund_category<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find()
        .filter(categories::Column::Name.eq(name))
        .filter(categories::Column::Kind.eq(CategoryKind::Fund.key()))
        .one(conn)
        .await
}

/// The fund a category belongs to, if it is a fund category.
async fn fund_for_category<C: ConnectionTrait>(
    conn: &C,
    category: &categories::Model,
) -> Result<Option<funds::Model>, DbErr> {
    if category.kind != CategoryKind::Fund.key() {
        return Ok(None);
    }
    funds::Entity::find()
        .filter(funds::Column::Name.eq(category.name.as_str()))
        .one(conn)
        .await
}

async fn set_balance<C: ConnectionTrait>(
    conn: &C,
    fund: funds::Model,
    balance: Decimal,
) -> Result<(), DbErr> {
    let mut active: funds::ActiveModel = fund.into();
    active.current_balance = Set(balance);
    active.update(conn).await?;
    Ok(())
}

/// Applies the balance effect of a transaction booked to `category`.
///
/// # Errors
///
/// Returns `FundError::InsufficientBalance` when a withdrawal exceeds the balance.
pub(crate) async fn book_effect<C: ConnectionTrait>(
    conn: &C,
    category: &categories::Model,
    tx_type: TransactionType,
    amount: Decimal,
) -> Result<(), FundRepoError> {
    let Some(effect) = FundService::effect_of(tx_type, amount) else {
        return Ok(());
    };
    let Some(fund) = fund_for_category(conn, category).await? else {
        return Ok(());
    };
    let balance = FundService::apply(fund.current_balance, effect)?;
    set_balance(conn, fund, balance).await?;
    Ok(())
}

/// Rolls back the balance effect of a transaction booked to `category`.
pub(crate) async fn unbook_effect<C: ConnectionTrait>(
    conn: &C,
    category: &categories::Model,
    tx_type: TransactionType,
    amount: Decimal,
) -> Result<(), FundRepoError> {
    let Some(effect) = FundService::effect_of(tx_type, amount) else {
        return Ok(());
    };
    let Some(fund) = fund_for_category(conn, category).await? else {
        return Ok(());
    };
    let balance = FundService::revert(fund.current_balance, effect).map_err(FundError::from)?;
    set_balance(conn, fund, balance).await?;
    Ok(())
}

/// Creates the savings group for fund categories if it is missing.
async fn ensure_savings_group<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let existing = category_groups::Entity::find()
        .filter(category_groups::Column::Name.eq(SAVINGS_GROUP))
        .filter(category_groups::Column::Kind.eq(CategoryKind::Fund.key()))
        .one(conn)
        .await?;
    if existing.is_some() {
        return Ok(());
    }
    let max: Option<i32> = category_groups::Entity::find()
        .select_only()
        .column_as(category_groups::Column::SortOrder.max(), "max")
        .filter(category_groups::Column::Kind.eq(CategoryKind::Fund.key()))
        .into_tuple()
        .one(conn)
        .await?
        .flatten();
    category_groups::ActiveModel {
        name: Set(SAVINGS_GROUP.to_string()),
        kind: Set(CategoryKind::Fund.key().to_string()),
        sort_order: Set(max.map_or(0, |max| max + 1)),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Fund repository for CRUD operations and balance movements.
#[derive(Debug, Clone)]
pub struct FundRepository {
    db: DatabaseConnection,
}

impl FundRepository {
    /// Creates a new fund repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists funds ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_funds(&self) -> Result<Vec<Fund>, FundRepoError> {
        let models = funds::Entity::find()
            .order_by_asc(funds::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(fund_from_model).collect())
    }

    /// Gets a fund by ID.
    ///
    /// # Errors
    ///
    /// Returns `FundError::NotFound` if it does not exist.
    pub async fn get_fund(&self, id: FundId) -> Result<Fund, FundRepoError> {
        let model = self.find(&self.db, id).await?;
        Ok(fund_from_model(model))
    }

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: FundId,
    ) -> Result<funds::Model, FundRepoError> {
        funds::Entity::find_by_id(id.into_inner())
            .one(conn)
            .await?
            .ok_or_else(|| FundError::NotFound(id).into())
    }

    /// Whether a fund or category other than `except` already uses `name`.
    async fn name_taken<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        except: Option<&str>,
    ) -> Result<bool, DbErr> {
        let fund = funds::Entity::find()
            .filter(funds::Column::Name.eq(name))
            .one(conn)
            .await?;
        let category = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(conn)
            .await?;
        let is_other = |found: &str| except != Some(found);
        Ok(fund.is_some_and(|f| is_other(&f.name)) || category.is_some_and(|c| is_other(&c.name)))
    }

    /// Creates a fund together with its category.
    ///
    /// The category budgets the monthly contribution and is filed under the
    /// savings group, which is created when missing.
    ///
    /// # Errors
    ///
    /// Returns `FundError::DuplicateName` if a fund or category already uses
    /// the name.
    pub async fn create_fund(&self, input: NewFund) -> Result<Fund, FundRepoError> {
        let txn = self.db.begin().await?;
        if Self::name_taken(&txn, &input.name, None).await? {
            return Err(FundError::DuplicateName.into());
        }

        let model = funds::ActiveModel {
            name: Set(input.name.clone()),
            goal: Set(input.goal),
            goal_date: Set(input.goal_date),
            current_balance: Set(input.balance),
            monthly_contribution: Set(input.monthly_contribution),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        ensure_savings_group(&txn).await?;
        let sort_order = next_category_sort_order(&txn, CategoryKind::Fund).await?;
        categories::ActiveModel {
            name: Set(input.name),
            kind: Set(CategoryKind::Fund.key().to_string()),
            parent_category: Set(Some(SAVINGS_GROUP.to_string())),
            default_budget: Set(input.monthly_contribution),
            sort_order: Set(sort_order),
            is_custom: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(fund_id = model.id, name = %model.name, "Fund created");
        Ok(fund_from_model(model))
    }

    /// Updates a fund.
    ///
    /// A rename also renames the fund's category; a new monthly contribution
    /// becomes the category's default budget.
    ///
    /// # Errors
    ///
    /// Returns `FundError::NotFound` or `FundError::DuplicateName`.
    pub async fn update_fund(&self, id: FundId, patch: FundPatch) -> Result<Fund, FundRepoError> {
        let txn = self.db.begin().await?;
        let model = self.find(&txn, id).await?;
        let old_name = model.name.clone();

        if let Some(name) = &patch.name
            && *name != old_name
            && Self::name_taken(&txn, name, Some(&old_name)).await?
        {
            return Err(FundError::DuplicateName.into());
        }

        if let Some(category) = fund_category(&txn, &old_name).await? {
            let mut active: categories::ActiveModel = category.into();
            if let Some(name) = &patch.name {
                active.name = Set(name.clone());
            }
            if let Some(monthly) = patch.monthly_contribution {
                active.default_budget = Set(monthly);
            }
            active.update(&txn).await?;
        }

        let mut active: funds::ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(goal) = patch.goal {
            active.goal = Set(goal);
        }
        if let Some(goal_date) = patch.goal_date {
            active.goal_date = Set(goal_date);
        }
        if let Some(monthly) = patch.monthly_contribution {
            active.monthly_contribution = Set(monthly);
        }
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(fund_id = updated.id, "Fund updated");
        Ok(fund_from_model(updated))
    }

    /// Deletes a fund, its category and everything booked to that category.
    ///
    /// # Errors
    ///
    /// Returns `FundError::NotFound` if the fund does not exist.
    pub async fn delete_fund(&self, id: FundId) -> Result<(), FundRepoError> {
        let txn = self.db.begin().await?;
        let model = self.find(&txn, id).await?;

        if let Some(category) = fund_category(&txn, &model.name).await? {
            transactions::Entity::delete_many()
                .filter(transactions::Column::CategoryId.eq(category.id))
                .exec(&txn)
                .await?;
            budget_overrides::Entity::delete_many()
                .filter(budget_overrides::Column::CategoryId.eq(category.id))
                .exec(&txn)
                .await?;
            categories::Entity::delete_by_id(category.id).exec(&txn).await?;
        }
        funds::Entity::delete_by_id(model.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(fund_id = model.id, name = %model.name, "Fund deleted");
        Ok(())
    }

    /// Records a contribution dated `today` and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `FundError::NotFound` or `FundError::CategoryNotFound`.
    pub async fn contribute(
        &self,
        id: FundId,
        amount: Decimal,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<Decimal, FundRepoError> {
        self.move_balance(id, TransactionType::FundContribution, amount, notes, today)
            .await
    }

    /// Records a withdrawal dated `today` and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `FundError::InsufficientBalance` when `amount` exceeds the
    /// balance, `FundError::NotFound` or `FundError::CategoryNotFound`.
    pub async fn withdraw(
        &self,
        id: FundId,
        amount: Decimal,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<Decimal, FundRepoError> {
        self.move_balance(id, TransactionType::FundWithdrawal, amount, notes, today)
            .await
    }

    async fn move_balance(
        &self,
        id: FundId,
        tx_type: TransactionType,
        amount: Decimal,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<Decimal, FundRepoError> {
        let txn = self.db.begin().await?;
        let fund = self.find(&txn, id).await?;
        let Some(effect) = FundService::effect_of(tx_type, amount) else {
            return Ok(fund.current_balance);
        };
        let balance = FundService::apply(fund.current_balance, effect)?;
        let category = fund_category(&txn, &fund.name)
            .await?
            .ok_or(FundError::CategoryNotFound)?;

        let description = match tx_type {
            TransactionType::FundWithdrawal => format!("Withdrawal from {}", fund.name),
            _ => format!("Contribution to {}", fund.name),
        };
        let draft = TransactionDraft {
            date: today,
            transaction_type: tx_type,
            amount,
            category_id: CategoryId::new(category.id),
            description,
            merchant: String::new(),
            notes: notes.unwrap_or_default(),
        };
        insert_row(&txn, &draft).await?;
        let fund_id = fund.id;
        set_balance(&txn, fund, balance).await?;
        txn.commit().await?;

        tracing::info!(
            fund_id,
            transaction_type = %tx_type,
            amount = %amount,
            balance = %balance,
            "Fund balance moved"
        );
        Ok(balance)
    }

    /// Rebuilds every fund balance from its category's transactions.
    ///
    /// Funds without a category keep their balance. Returns the number of
    /// funds recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn refresh_balances(&self) -> Result<usize, FundRepoError> {
        let txn = self.db.begin().await?;
        let all = funds::Entity::find().all(&txn).await?;
        let mut refreshed = 0;

        for fund in all {
            let Some(category) = fund_category(&txn, &fund.name).await? else {
                continue;
            };
            let rows: Vec<(String, Decimal)> = transactions::Entity::find()
                .select_only()
                .column(transactions::Column::TransactionType)
                .column(transactions::Column::Amount)
                .filter(transactions::Column::CategoryId.eq(category.id))
                .into_tuple()
                .all(&txn)
                .await?;
            let movements = rows
                .iter()
                .map(|(tx_type, amount)| Ok((parse_transaction_type(tx_type)?, *amount)))
                .collect::<Result<Vec<_>, DbErr>>()?;
            let balance = FundService::recompute_balance(movements).map_err(FundError::from)?;
            tracing::debug!(fund_id = fund.id, balance = %balance, "Fund balance recomputed");
            set_balance(&txn, fund, balance).await?;
            refreshed += 1;
        }
        txn.commit().await?;

        tracing::info!(refreshed, "Fund balances refreshed");
        Ok(refreshed)
    }
}
