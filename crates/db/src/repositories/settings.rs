//! Key/value settings repository.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use tally_shared::types::YearMonth;

use crate::entities::settings;

/// Key of the month last selected by the user.
pub const SELECTED_MONTH: &str = "selected_month";

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads a raw setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        let model = settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(|model| model.value))
    }

    /// Writes a raw setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), DbErr> {
        match settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?
        {
            Some(model) => {
                let mut active: settings::ActiveModel = model.into();
                active.value = Set(value.to_string());
                active.update(&self.db).await?;
            }
            None => {
                settings::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(value.to_string()),
                }
                .insert(&self.db)
                .await?;
            }
        }
        Ok(())
    }

    /// The remembered month; an unparseable stored value reads as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn selected_month(&self) -> Result<Option<YearMonth>, DbErr> {
        let stored = self.get(SELECTED_MONTH).await?;
        Ok(stored.and_then(|value| value.parse().ok()))
    }

    /// Remembers the selected month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set_selected_month(&self, month: YearMonth) -> Result<(), DbErr> {
        self.set(SELECTED_MONTH, &month.to_string()).await?;
        tracing::debug!(%month, "Selected month saved");
        Ok(())
    }
}
