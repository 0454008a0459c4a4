//! Category and category group repository.
//!
//! Multi-row changes (cascading deletes, group renames, bulk updates) run in
//! one database transaction.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tally_core::category::{
    Category, CategoryError, CategoryGroup, CategoryKind, CategoryPatch, CategoryService,
    CategoryType, DefaultBudgetUpdate, NewCategory, SortOrderUpdate,
};
use tally_shared::types::{CategoryGroupId, CategoryId};

use crate::entities::{budget_overrides, categories, category_groups, funds, transactions};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryRepoError {
    /// Domain rule violation.
    #[error(transparent)]
    Category(#[from] CategoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Parses a stored kind key.
pub(crate) fn parse_kind(key: &str) -> Result<CategoryKind, DbErr> {
    CategoryKind::from_key(key).ok_or_else(|| DbErr::Type(format!("unknown category kind: {key}")))
}

/// Storage keys of every kind reported as `category_type`.
pub(crate) fn kind_keys(category_type: CategoryType) -> Vec<&'static str> {
    category_type.kinds().iter().map(|kind| kind.key()).collect()
}

pub(crate) fn category_from_model(model: categories::Model) -> Result<Category, DbErr> {
    Ok(Category {
        id: CategoryId::new(model.id),
        kind: parse_kind(&model.kind)?,
        name: model.name,
        parent_category: model.parent_category,
        default_budget: model.default_budget,
        sort_order: model.sort_order,
        is_custom: model.is_custom,
    })
}

fn group_from_model(model: category_groups::Model) -> Result<CategoryGroup, DbErr> {
    Ok(CategoryGroup {
        id: CategoryGroupId::new(model.id),
        kind: parse_kind(&model.kind)?,
        name: model.name,
        sort_order: model.sort_order,
    })
}

/// Sort order placing a new category of `kind` first.
pub(crate) async fn next_category_sort_order<C: ConnectionTrait>(
    conn: &C,
    kind: CategoryKind,
) -> Result<i32, DbErr> {
    let existing: Vec<i32> = categories::Entity::find()
        .select_only()
        .column(categories::Column::SortOrder)
        .filter(categories::Column::Kind.eq(kind.key()))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(CategoryService::next_sort_order(existing))
}

/// Whether a group named `name` exists among the groups of `category_type`.
async fn group_exists<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    category_type: CategoryType,
) -> Result<bool, DbErr> {
    let found = category_groups::Entity::find()
        .filter(category_groups::Column::Name.eq(name))
        .filter(category_groups::Column::Kind.is_in(kind_keys(category_type)))
        .one(conn)
        .await?;
    Ok(found.is_some())
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Lists categories ordered by sort order then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>, CategoryRepoError> {
        let mut query = categories::Entity::find();
        if let Some(category_type) = category_type {
            query = query.filter(categories::Column::Kind.is_in(kind_keys(category_type)));
        }
        let models = query
            .order_by_asc(categories::Column::SortOrder)
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(category_from_model)
            .collect::<Result<_, _>>()?)
    }

    /// Gets a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if it does not exist.
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, CategoryRepoError> {
        let model = categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;
        Ok(category_from_model(model)?)
    }

    /// IDs of every stored category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn category_ids(&self) -> Result<HashSet<CategoryId>, CategoryRepoError> {
        let ids: Vec<i32> = categories::Entity::find()
            .select_only()
            .column(categories::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids.into_iter().map(CategoryId::new).collect())
    }

    /// Creates a category, placed first among its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The referenced group does not exist for the category's type
    /// - Another category already has this name
    /// - Database operation fails
    pub async fn create_category(&self, input: NewCategory) -> Result<Category, CategoryRepoError> {
        let parent = input
            .parent_category
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if let Some(parent) = &parent {
            if !group_exists(&self.db, parent, input.kind.category_type()).await? {
                return Err(CategoryError::GroupMissing.into());
            }
        }

        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(input.name.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CategoryError::DuplicateName.into());
        }

        let sort_order = next_category_sort_order(&self.db, input.kind).await?;
        let model = categories::ActiveModel {
            name: Set(input.name),
            kind: Set(input.kind.key().to_string()),
            parent_category: Set(parent),
            default_budget: Set(input.default_budget),
            sort_order: Set(sort_order),
            is_custom: Set(input.is_custom),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(category_id = model.id, name = %model.name, kind = %model.kind, "Category created");
        Ok(category_from_model(model)?)
    }

    /// Updates a category.
    ///
    /// Renaming a fund category renames its fund.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The category is not found
    /// - The new name is taken
    /// - The new group does not exist for the category's type
    /// - Database operation fails
    pub async fn update_category(
        &self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, CategoryRepoError> {
        let model = categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;
        let kind = parse_kind(&model.kind)?;
        let old_name = model.name.clone();

        let txn = self.db.begin().await?;
        let mut active: categories::ActiveModel = model.into();

        if let Some(name) = patch.name.filter(|name| *name != old_name) {
            let taken = categories::Entity::find()
                .filter(categories::Column::Name.eq(name.as_str()))
                .one(&txn)
                .await?;
            if taken.is_some() {
                return Err(CategoryError::DuplicateName.into());
            }
            if kind == CategoryKind::Fund {
                funds::Entity::update_many()
                    .col_expr(funds::Column::Name, Expr::value(name.clone()))
                    .filter(funds::Column::Name.eq(old_name.as_str()))
                    .exec(&txn)
                    .await?;
            }
            active.name = Set(name);
        }
        if let Some(parent) = patch.parent_category {
            let parent = parent.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
            if let Some(parent) = &parent {
                if !group_exists(&txn, parent, kind.category_type()).await? {
                    return Err(CategoryError::GroupMissing.into());
                }
            }
            active.parent_category = Set(parent);
        }
        if let Some(default_budget) = patch.default_budget {
            active.default_budget = Set(default_budget);
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(category_id = updated.id, "Category updated");
        Ok(category_from_model(updated)?)
    }

    /// Deletes a category with its overrides and transactions; a fund
    /// category also takes its fund.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or a database operation fails.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), CategoryRepoError> {
        let model = categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let txn = self.db.begin().await?;
        budget_overrides::Entity::delete_many()
            .filter(budget_overrides::Column::CategoryId.eq(model.id))
            .exec(&txn)
            .await?;
        let removed = transactions::Entity::delete_many()
            .filter(transactions::Column::CategoryId.eq(model.id))
            .exec(&txn)
            .await?;
        if parse_kind(&model.kind)? == CategoryKind::Fund {
            funds::Entity::delete_many()
                .filter(funds::Column::Name.eq(model.name.as_str()))
                .exec(&txn)
                .await?;
        }
        categories::Entity::delete_by_id(model.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            category_id = model.id,
            transactions_removed = removed.rows_affected,
            "Category deleted"
        );
        Ok(())
    }

    /// Applies new sort orders; unknown IDs are ignored.
    ///
    /// Sort orders need not be unique: categories sharing one list by name.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn reorder_categories(&self, order: &[SortOrderUpdate]) -> Result<(), CategoryRepoError> {
        let txn = self.db.begin().await?;
        for update in order {
            categories::Entity::update_many()
                .col_expr(categories::Column::SortOrder, Expr::value(update.sort_order))
                .filter(categories::Column::Id.eq(update.id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Sets many default budgets at once; nothing is written if any amount is invalid.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::InvalidAmountFor` naming the first bad entry.
    pub async fn update_all_defaults(
        &self,
        updates: &[DefaultBudgetUpdate],
    ) -> Result<(), CategoryRepoError> {
        let txn = self.db.begin().await?;
        for update in updates {
            let Some(model) = categories::Entity::find_by_id(update.category_id)
                .one(&txn)
                .await?
            else {
                continue;
            };
            let amount = CategoryService::validate_default_budget(&model.name, &update.amount)?;
            let mut active: categories::ActiveModel = model.into();
            active.default_budget = Set(amount);
            active.update(&txn).await?;
        }
        txn.commit().await?;
        tracing::info!(count = updates.len(), "Default budgets updated");
        Ok(())
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// Lists groups ordered by sort order then ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_groups(
        &self,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<CategoryGroup>, CategoryRepoError> {
        let mut query = category_groups::Entity::find();
        if let Some(category_type) = category_type {
            query = query.filter(category_groups::Column::Kind.is_in(kind_keys(category_type)));
        }
        let models = query
            .order_by_asc(category_groups::Column::SortOrder)
            .order_by_asc(category_groups::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(group_from_model)
            .collect::<Result<_, _>>()?)
    }

    /// Creates a group, placed first among its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the `(name, kind)` pair exists,
    /// or a database operation fails.
    pub async fn create_group(
        &self,
        name: &str,
        kind: CategoryKind,
    ) -> Result<CategoryGroup, CategoryRepoError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::GroupFieldsRequired.into());
        }
        let existing = category_groups::Entity::find()
            .filter(category_groups::Column::Name.eq(name))
            .filter(category_groups::Column::Kind.eq(kind.key()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CategoryError::DuplicateGroup.into());
        }

        let existing_orders: Vec<i32> = category_groups::Entity::find()
            .select_only()
            .column(category_groups::Column::SortOrder)
            .filter(category_groups::Column::Kind.eq(kind.key()))
            .into_tuple()
            .all(&self.db)
            .await?;
        let model = category_groups::ActiveModel {
            name: Set(name.to_string()),
            kind: Set(kind.key().to_string()),
            sort_order: Set(CategoryService::next_sort_order(existing_orders)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(group_id = model.id, name = %model.name, kind = %model.kind, "Group created");
        Ok(group_from_model(model)?)
    }

    /// Renames a group and every category filed under it.
    ///
    /// When a group of the other income kind keeps the old name, only
    /// categories of the renamed group's own kind move.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the group is not found, another
    /// group of the same kind has the name, or a database operation fails.
    pub async fn rename_group(
        &self,
        id: CategoryGroupId,
        name: Option<&str>,
    ) -> Result<CategoryGroup, CategoryRepoError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(CategoryError::GroupNameRequired)?;
        let group = category_groups::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CategoryError::GroupNotFound(id))?;
        let kind = parse_kind(&group.kind)?;

        let clash = category_groups::Entity::find()
            .filter(category_groups::Column::Name.eq(name))
            .filter(category_groups::Column::Kind.eq(group.kind.as_str()))
            .filter(category_groups::Column::Id.ne(group.id))
            .one(&self.db)
            .await?;
        if clash.is_some() {
            return Err(CategoryError::DuplicateGroup.into());
        }

        let old_name = group.name.clone();
        let txn = self.db.begin().await?;
        let mut active: category_groups::ActiveModel = group.into();
        active.name = Set(name.to_string());
        let updated = active.update(&txn).await?;
        let mut members = categories::Entity::update_many()
            .col_expr(categories::Column::ParentCategory, Expr::value(name))
            .filter(categories::Column::ParentCategory.eq(old_name.as_str()));
        members = if group_exists(&txn, &old_name, kind.category_type()).await? {
            members.filter(categories::Column::Kind.eq(kind.key()))
        } else {
            members.filter(categories::Column::Kind.is_in(kind_keys(kind.category_type())))
        };
        members.exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(group_id = updated.id, from = %old_name, to = %updated.name, "Group renamed");
        Ok(group_from_model(updated)?)
    }

    /// Deletes a group; its categories fall back to "Other".
    ///
    /// # Errors
    ///
    /// Returns an error if the group is not found or a database operation fails.
    pub async fn delete_group(&self, id: CategoryGroupId) -> Result<(), CategoryRepoError> {
        let group = category_groups::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CategoryError::GroupNotFound(id))?;
        let category_type = parse_kind(&group.kind)?.category_type();

        let txn = self.db.begin().await?;
        category_groups::Entity::delete_by_id(group.id).exec(&txn).await?;
        // A same-named group of the other income kind keeps the members.
        if !group_exists(&txn, &group.name, category_type).await? {
            categories::Entity::update_many()
                .col_expr(categories::Column::ParentCategory, Expr::value(Option::<String>::None))
                .filter(categories::Column::ParentCategory.eq(group.name.as_str()))
                .filter(categories::Column::Kind.is_in(kind_keys(category_type)))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        tracing::info!(group_id = group.id, name = %group.name, "Group deleted");
        Ok(())
    }

    /// Applies new group sort orders; unknown IDs are ignored.
    ///
    /// Groups sharing a sort order list in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn reorder_groups(&self, order: &[SortOrderUpdate]) -> Result<(), CategoryRepoError> {
        let txn = self.db.begin().await?;
        for update in order {
            category_groups::Entity::update_many()
                .col_expr(category_groups::Column::SortOrder, Expr::value(update.sort_order))
                .filter(category_groups::Column::Id.eq(update.id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
