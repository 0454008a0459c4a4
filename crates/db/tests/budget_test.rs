//! Integration tests for budgets, keywords, settings and seeding.

mod common;

use common::{create_category, date, draft, setup_db};
use rust_decimal_macros::dec;
use tally_core::budget::{BudgetError, BudgetStatus};
use tally_core::category::{CategoryKind, CategoryType};
use tally_core::import::DEFAULT_KEYWORDS;
use tally_core::ledger::TransactionType;
use tally_db::repositories::BudgetRepoError;
use tally_db::seed::DEFAULT_CATEGORIES;
use tally_db::{
    BudgetRepository, CategoryRepository, KeywordRepository, SettingsRepository,
    TransactionRepository, seed_defaults,
};
use tally_shared::types::{CategoryId, YearMonth};

fn march() -> YearMonth {
    YearMonth::new(2024, 3).unwrap()
}

// ============================================================================
// Budgets
// ============================================================================

#[tokio::test]
async fn test_month_override_leaves_default_untouched() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db.clone());
    let rent = create_category(&db, "Rent", CategoryKind::Expense, dec!(1500)).await;

    repo.set_month_override(march(), rent.id, dec!(1600)).await.unwrap();
    repo.set_month_override(march(), rent.id, dec!(1700)).await.unwrap();

    let march_rows = repo.monthly_categories(march()).await.unwrap();
    assert_eq!(march_rows[0].monthly_budget, dec!(1700));
    assert!(march_rows[0].is_override);
    assert_eq!(march_rows[0].default_budget, dec!(1500));

    let april = repo.monthly_categories(march().next()).await.unwrap();
    assert_eq!(april[0].monthly_budget, dec!(1500));
    assert!(!april[0].is_override);

    let category = CategoryRepository::new(db).get_category(rent.id).await.unwrap();
    assert_eq!(category.default_budget, dec!(1500));

    let overrides = repo.list_overrides().await.unwrap();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].month, "2024-03");
    assert_eq!(overrides[0].category, "Rent");
}

#[tokio::test]
async fn test_override_for_unknown_category() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db);
    let err = repo
        .set_month_override(march(), CategoryId::new(77), dec!(1))
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetRepoError::Budget(BudgetError::CategoryNotFound(_))));
}

#[tokio::test]
async fn test_comparison_counts_month_only() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let food = create_category(&db, "Groceries", CategoryKind::Expense, dec!(400)).await;
    let salary = create_category(&db, "Salary", CategoryKind::SALARY, dec!(5000)).await;

    for (category, tx_type, amount, on) in [
        (&food, TransactionType::Expense, dec!(250), date(2024, 3, 3)),
        (&food, TransactionType::Expense, dec!(200), date(2024, 3, 31)),
        (&food, TransactionType::Expense, dec!(999), date(2024, 4, 1)),
        (&salary, TransactionType::Income, dec!(5200), date(2024, 3, 15)),
    ] {
        transactions
            .create_transaction(draft(category, tx_type, amount, on))
            .await
            .unwrap();
    }

    let entries = repo.comparison(march()).await.unwrap();
    let groceries = entries.iter().find(|e| e.category_id == food.id).unwrap();
    assert_eq!(groceries.actual, dec!(450));
    assert_eq!(groceries.difference, dec!(-50));
    assert_eq!(groceries.status, BudgetStatus::Over);

    let pay = entries.iter().find(|e| e.category_id == salary.id).unwrap();
    assert_eq!(pay.actual, dec!(5200));
    assert_eq!(pay.difference, dec!(200));
    assert_eq!(pay.status, BudgetStatus::Under);
}

// ============================================================================
// Keywords & settings
// ============================================================================

#[tokio::test]
async fn test_keyword_upsert_keeps_position() {
    let db = setup_db().await;
    let repo = KeywordRepository::new(db);
    repo.add_keyword("BAKERY", "Dining").await.unwrap();
    repo.add_keyword("KROGER", "Groceries").await.unwrap();
    repo.add_keyword("BAKERY", "Treats").await.unwrap();

    let categorizer = repo.categorizer().await.unwrap();
    assert_eq!(categorizer.len(), 2);
    assert_eq!(categorizer.categorize("local bakery"), Some("Treats"));
}

#[tokio::test]
async fn test_selected_month_round_trip() {
    let db = setup_db().await;
    let repo = SettingsRepository::new(db);
    assert_eq!(repo.selected_month().await.unwrap(), None);

    repo.set_selected_month(march()).await.unwrap();
    repo.set_selected_month(march().next()).await.unwrap();
    assert_eq!(repo.selected_month().await.unwrap(), Some(march().next()));

    repo.set("selected_month", "garbage").await.unwrap();
    assert_eq!(repo.selected_month().await.unwrap(), None);
}

// ============================================================================
// Seeding
// ============================================================================

#[tokio::test]
async fn test_seed_is_idempotent() {
    let db = setup_db().await;

    let first = seed_defaults(&db).await.unwrap();
    assert_eq!(first.categories, DEFAULT_CATEGORIES.len());
    assert_eq!(first.keywords, DEFAULT_KEYWORDS.len());
    // Income, Deductions, Housing, Food, Transportation, Personal, Other.
    assert_eq!(first.groups, 7);

    let second = seed_defaults(&db).await.unwrap();
    assert_eq!(second.categories, 0);
    assert_eq!(second.groups, 0);
    assert_eq!(second.keywords, 0);

    let categories = CategoryRepository::new(db.clone());
    let income = categories.list_categories(Some(CategoryType::Income)).await.unwrap();
    assert_eq!(income.len(), 7);
    assert_eq!(income.iter().filter(|c| c.kind.is_deduction()).count(), 6);
    assert!(income.iter().all(|c| !c.is_custom));
}
