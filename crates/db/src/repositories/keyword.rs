//! Merchant keyword repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tally_core::import::KeywordCategorizer;

use crate::entities::category_keywords;

/// Inserts or repoints one keyword mapping; an existing keyword keeps its position.
pub(crate) async fn upsert_keyword<C: ConnectionTrait>(
    conn: &C,
    keyword: &str,
    category: &str,
) -> Result<(), DbErr> {
    let existing = category_keywords::Entity::find()
        .filter(category_keywords::Column::Keyword.eq(keyword))
        .one(conn)
        .await?;
    match existing {
        Some(model) => {
            let mut active: category_keywords::ActiveModel = model.into();
            active.category = Set(category.to_string());
            active.update(conn).await?;
        }
        None => {
            category_keywords::ActiveModel {
                keyword: Set(keyword.to_string()),
                category: Set(category.to_string()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

/// Keyword repository.
#[derive(Debug, Clone)]
pub struct KeywordRepository {
    db: DatabaseConnection,
}

impl KeywordRepository {
    /// Creates a new keyword repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stored mappings as a categorizer, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn categorizer(&self) -> Result<KeywordCategorizer, DbErr> {
        let models = category_keywords::Entity::find()
            .order_by_asc(category_keywords::Column::Id)
            .all(&self.db)
            .await?;
        Ok(KeywordCategorizer::new(
            models.into_iter().map(|model| (model.keyword, model.category)),
        ))
    }

    /// Adds a mapping or repoints an existing keyword.
    ///
    /// `keyword` is expected upper-cased already.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn add_keyword(&self, keyword: &str, category: &str) -> Result<(), DbErr> {
        upsert_keyword(&self.db, keyword, category).await?;
        tracing::info!(keyword, category, "Keyword saved");
        Ok(())
    }
}
