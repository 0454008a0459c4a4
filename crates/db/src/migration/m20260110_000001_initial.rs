//! Initial database migration.
//!
//! Creates the budgeting tables: categories and their groups, transactions,
//! funds, per-month budget overrides, merchant keywords and settings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CATEGORIES
        // ============================================================
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(CATEGORY_GROUPS_SQL).await?;

        // ============================================================
        // PART 2: LEDGER
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 3: FUNDS & BUDGETS
        // ============================================================
        db.execute_unprepared(FUNDS_SQL).await?;
        db.execute_unprepared(BUDGET_OVERRIDES_SQL).await?;

        // ============================================================
        // PART 4: IMPORT & SETTINGS
        // ============================================================
        db.execute_unprepared(CATEGORY_KEYWORDS_SQL).await?;
        db.execute_unprepared(SETTINGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            VARCHAR(100) NOT NULL UNIQUE,
    kind            VARCHAR(20) NOT NULL
        CHECK (kind IN ('income', 'deduction', 'expense', 'fund')),
    parent_category VARCHAR(100),
    default_budget  REAL NOT NULL DEFAULT 0 CHECK (default_budget >= 0),
    sort_order      INTEGER NOT NULL DEFAULT 0,
    is_custom       BOOLEAN NOT NULL DEFAULT 1
);

CREATE INDEX idx_categories_kind_sort ON categories(kind, sort_order);
";

const CATEGORY_GROUPS_SQL: &str = r"
CREATE TABLE category_groups (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       VARCHAR(100) NOT NULL,
    kind       VARCHAR(20) NOT NULL
        CHECK (kind IN ('income', 'deduction', 'expense', 'fund')),
    sort_order INTEGER NOT NULL DEFAULT 0,
    UNIQUE (name, kind)
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    date             DATE NOT NULL,
    transaction_type VARCHAR(20) NOT NULL
        CHECK (transaction_type IN ('income', 'expense', 'fund_contribution', 'fund_withdrawal')),
    amount           REAL NOT NULL CHECK (amount >= 0),
    category_id      INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    description      VARCHAR(200) NOT NULL DEFAULT '',
    merchant         VARCHAR(100) NOT NULL DEFAULT '',
    notes            VARCHAR(300) NOT NULL DEFAULT ''
);

CREATE INDEX idx_transactions_date ON transactions(date);
CREATE INDEX idx_transactions_category ON transactions(category_id);
";

const FUNDS_SQL: &str = r"
CREATE TABLE funds (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    name                 VARCHAR(100) NOT NULL UNIQUE,
    goal                 REAL NOT NULL DEFAULT 0,
    goal_date            DATE,
    current_balance      REAL NOT NULL DEFAULT 0,
    monthly_contribution REAL NOT NULL DEFAULT 0
);
";

const BUDGET_OVERRIDES_SQL: &str = r"
CREATE TABLE budget_overrides (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    month       CHAR(7) NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    amount      REAL NOT NULL CHECK (amount >= 0),
    UNIQUE (month, category_id)
);
";

const CATEGORY_KEYWORDS_SQL: &str = r"
CREATE TABLE category_keywords (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword  VARCHAR(100) NOT NULL UNIQUE,
    category VARCHAR(100) NOT NULL
);
";

const SETTINGS_SQL: &str = r#"
CREATE TABLE settings (
    "key"   VARCHAR(50) PRIMARY KEY NOT NULL,
    "value" TEXT NOT NULL
);
"#;

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS settings;
DROP TABLE IF EXISTS category_keywords;
DROP TABLE IF EXISTS budget_overrides;
DROP TABLE IF EXISTS funds;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS category_groups;
DROP TABLE IF EXISTS categories;
";
