//! Backfills the deduction kind.
//!
//! Rows loaded as plain `income` whose name contains "deduction" (any case)
//! become `deduction`. Aggregation code only reads the stored kind.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(BACKFILL_CATEGORIES_SQL).await?;
        db.execute_unprepared(BACKFILL_GROUPS_SQL).await?;
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // The original income/deduction split cannot be recovered.
        Ok(())
    }
}

const BACKFILL_CATEGORIES_SQL: &str = r"
UPDATE categories
SET kind = 'deduction'
WHERE kind = 'income' AND lower(name) LIKE '%deduction%';
";

const BACKFILL_GROUPS_SQL: &str = r"
UPDATE category_groups
SET kind = 'deduction'
WHERE kind = 'income'
  AND lower(name) LIKE '%deduction%'
  AND NOT EXISTS (
      SELECT 1 FROM category_groups g
      WHERE g.name = category_groups.name AND g.kind = 'deduction'
  );
";
