//! Transaction repository.
//!
//! Writes to a fund category move the fund balance in the same database
//! transaction as the row itself.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SelectTwo, Set, TransactionTrait,
};
use tally_core::category::CategoryKind;
use tally_core::import::ImportPlan;
use tally_core::ledger::{
    TransactionDraft, TransactionError, TransactionFilter, TransactionPatch, TransactionRow,
    TransactionType,
};
use tally_shared::types::{CategoryId, TransactionId};

use super::category::{next_category_sort_order, parse_kind};
use super::fund::{FundRepoError, book_effect, unbook_effect};
use crate::entities::{categories, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionRepoError {
    /// Domain rule violation.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FundRepoError> for TransactionRepoError {
    fn from(err: FundRepoError) -> Self {
        match err {
            FundRepoError::Fund(err) => Self::Transaction(err.into()),
            FundRepoError::Database(err) => Self::Database(err),
        }
    }
}

pub(crate) fn parse_transaction_type(text: &str) -> Result<TransactionType, DbErr> {
    text.parse()
        .map_err(|_| DbErr::Type(format!("unknown transaction type: {text}")))
}

/// Joins a stored transaction with its category.
pub(crate) fn row_from_models(
    tx: transactions::Model,
    category: Option<categories::Model>,
) -> Result<TransactionRow, DbErr> {
    let category = category.ok_or_else(|| {
        DbErr::RecordNotFound(format!("category {} of transaction {}", tx.category_id, tx.id))
    })?;
    Ok(TransactionRow {
        id: TransactionId::new(tx.id),
        date: tx.date,
        transaction_type: parse_transaction_type(&tx.transaction_type)?,
        amount: tx.amount,
        category_id: CategoryId::new(tx.category_id),
        category_kind: parse_kind(&category.kind)?,
        category: category.name,
        parent_category: category.parent_category,
        description: tx.description,
        merchant: tx.merchant,
        notes: tx.notes,
    })
}

fn draft_from_model(tx: &transactions::Model) -> Result<TransactionDraft, DbErr> {
    Ok(TransactionDraft {
        date: tx.date,
        transaction_type: parse_transaction_type(&tx.transaction_type)?,
        amount: tx.amount,
        category_id: CategoryId::new(tx.category_id),
        description: tx.description.clone(),
        merchant: tx.merchant.clone(),
        notes: tx.notes.clone(),
    })
}

/// Inserts a transaction row without touching fund balances.
pub(crate) async fn insert_row<C: ConnectionTrait>(
    conn: &C,
    draft: &TransactionDraft,
) -> Result<transactions::Model, DbErr> {
    transactions::ActiveModel {
        date: Set(draft.date),
        transaction_type: Set(draft.transaction_type.as_str().to_string()),
        amount: Set(draft.amount),
        category_id: Set(draft.category_id.into_inner()),
        description: Set(draft.description.clone()),
        merchant: Set(draft.merchant.clone()),
        notes: Set(draft.notes.clone()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

async fn load_category<C: ConnectionTrait>(
    conn: &C,
    id: CategoryId,
) -> Result<categories::Model, TransactionRepoError> {
    categories::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| TransactionError::InvalidCategory.into())
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn joined() -> SelectTwo<transactions::Entity, categories::Entity> {
        transactions::Entity::find().find_also_related(categories::Entity)
    }

    async fn fetch(
        &self,
        query: SelectTwo<transactions::Entity, categories::Entity>,
    ) -> Result<Vec<TransactionRow>, TransactionRepoError> {
        let pairs = query.all(&self.db).await?;
        Ok(pairs
            .into_iter()
            .map(|(tx, category)| row_from_models(tx, category))
            .collect::<Result<_, _>>()?)
    }

    /// Lists transactions visible under `filter`, newest first.
    ///
    /// Month, type and category narrow the query; the search text is matched
    /// case-insensitively against description, merchant and notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRow>, TransactionRepoError> {
        let mut query = Self::joined();
        if let Some(month) = filter.month {
            let (start, end) = month.date_range();
            query = query
                .filter(transactions::Column::Date.gte(start))
                .filter(transactions::Column::Date.lt(end));
        }
        if let Some(tx_type) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(tx_type.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id.into_inner()));
        }
        let query = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id);

        let rows = self.fetch(query).await?;
        Ok(rows.into_iter().filter(|row| filter.matches(row)).collect())
    }

    /// Transactions dated in `[start, end)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRow>, TransactionRepoError> {
        let query = Self::joined()
            .filter(transactions::Column::Date.gte(start))
            .filter(transactions::Column::Date.lt(end))
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id);
        self.fetch(query).await
    }

    /// Every transaction, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<TransactionRow>, TransactionRepoError> {
        let query = Self::joined()
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id);
        self.fetch(query).await
    }

    /// The `limit` most recent transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(&self, limit: u64) -> Result<Vec<TransactionRow>, TransactionRepoError> {
        let query = Self::joined()
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id)
            .limit(limit);
        self.fetch(query).await
    }

    /// Gets a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if it does not exist.
    pub async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<TransactionRow, TransactionRepoError> {
        let (tx, category) = Self::joined()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        Ok(row_from_models(tx, category)?)
    }

    /// Creates a transaction, applying its fund effect.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The category does not exist
    /// - A withdrawal exceeds the fund balance
    /// - Database operation fails
    pub async fn create_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<TransactionRow, TransactionRepoError> {
        let txn = self.db.begin().await?;
        let category = load_category(&txn, draft.category_id).await?;
        book_effect(&txn, &category, draft.transaction_type, draft.amount).await?;
        let model = insert_row(&txn, &draft).await?;
        txn.commit().await?;

        tracing::info!(
            transaction_id = model.id,
            transaction_type = %model.transaction_type,
            amount = %model.amount,
            category_id = model.category_id,
            "Transaction created"
        );
        Ok(row_from_models(model, Some(category))?)
    }

    /// Updates a transaction.
    ///
    /// The previous fund effect is rolled back before the new one is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The transaction or the new category does not exist
    /// - A withdrawal exceeds the fund balance
    /// - Database operation fails
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<TransactionRow, TransactionRepoError> {
        let txn = self.db.begin().await?;
        let current = transactions::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        let previous = draft_from_model(&current)?;

        if let Some(old_category) = categories::Entity::find_by_id(current.category_id)
            .one(&txn)
            .await?
        {
            unbook_effect(&txn, &old_category, previous.transaction_type, previous.amount).await?;
        }

        let next = patch.apply_to(previous);
        let category = load_category(&txn, next.category_id).await?;
        book_effect(&txn, &category, next.transaction_type, next.amount).await?;

        let mut active: transactions::ActiveModel = current.into();
        active.date = Set(next.date);
        active.transaction_type = Set(next.transaction_type.as_str().to_string());
        active.amount = Set(next.amount);
        active.category_id = Set(next.category_id.into_inner());
        active.description = Set(next.description);
        active.merchant = Set(next.merchant);
        active.notes = Set(next.notes);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(transaction_id = updated.id, "Transaction updated");
        Ok(row_from_models(updated, Some(category))?)
    }

    /// Deletes a transaction, rolling back its fund effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is not found or a database operation fails.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), TransactionRepoError> {
        let txn = self.db.begin().await?;
        let (tx, category) = Self::joined()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        if let Some(category) = &category {
            let tx_type = parse_transaction_type(&tx.transaction_type)?;
            unbook_effect(&txn, category, tx_type, tx.amount).await?;
        }
        transactions::Entity::delete_by_id(tx.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(transaction_id = tx.id, "Transaction deleted");
        Ok(())
    }

    /// Stores an import plan, creating missing categories as expenses.
    ///
    /// Returns the number of transactions created.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails; nothing is stored then.
    pub async fn import_plan(&self, plan: &ImportPlan) -> Result<usize, TransactionRepoError> {
        let txn = self.db.begin().await?;
        let mut category_ids: HashMap<String, i32> = HashMap::new();

        for name in plan.category_names() {
            let existing = categories::Entity::find()
                .filter(categories::Column::Name.eq(name))
                .one(&txn)
                .await?;
            let id = match existing {
                Some(category) => category.id,
                None => {
                    let sort_order = next_category_sort_order(&txn, CategoryKind::Expense).await?;
                    let created = categories::ActiveModel {
                        name: Set(name.to_string()),
                        kind: Set(CategoryKind::Expense.key().to_string()),
                        sort_order: Set(sort_order),
                        is_custom: Set(true),
                        default_budget: Set(rust_decimal::Decimal::ZERO),
                        parent_category: Set(None),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                    tracing::info!(category_id = created.id, name = %created.name, "Category created by import");
                    created.id
                }
            };
            category_ids.insert(name.to_string(), id);
        }

        let mut created = 0;
        for planned in &plan.transactions {
            let Some(&category_id) = category_ids.get(&planned.category) else {
                continue;
            };
            let draft = TransactionDraft {
                date: planned.date,
                transaction_type: planned.transaction_type,
                amount: planned.amount,
                category_id: CategoryId::new(category_id),
                description: planned.merchant.clone(),
                merchant: planned.merchant.clone(),
                notes: String::new(),
            };
            insert_row(&txn, &draft).await?;
            created += 1;
        }
        txn.commit().await?;

        tracing::info!(
            created,
            skipped = plan.skipped,
            unknown_merchants = plan.unknown_merchants.len(),
            "Statement imported"
        );
        Ok(created)
    }
}

