//! Shared helpers for repository integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tally_core::category::{Category, CategoryKind, NewCategory};
use tally_core::ledger::{TransactionDraft, TransactionType};
use tally_db::{CategoryRepository, Migrator};

/// Fresh migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    kind: CategoryKind,
    default_budget: Decimal,
) -> Category {
    CategoryRepository::new(db.clone())
        .create_category(NewCategory {
            name: name.to_string(),
            kind,
            parent_category: None,
            default_budget,
            is_custom: true,
        })
        .await
        .expect("Failed to create category")
}

pub fn draft(
    category: &Category,
    transaction_type: TransactionType,
    amount: Decimal,
    on: NaiveDate,
) -> TransactionDraft {
    TransactionDraft {
        date: on,
        transaction_type,
        amount,
        category_id: category.id,
        description: format!("{} {}", transaction_type, category.name),
        merchant: String::new(),
        notes: String::new(),
    }
}
