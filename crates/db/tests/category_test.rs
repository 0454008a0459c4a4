//! Integration tests for the category repository.

mod common;

use common::{create_category, date, draft, setup_db};
use rust_decimal_macros::dec;
use serde_json::json;
use tally_core::category::{
    CategoryError, CategoryKind, CategoryPatch, CategoryType, DefaultBudgetUpdate, NewCategory,
    SortOrderUpdate,
};
use tally_core::fund::{FundInput, FundService};
use tally_core::ledger::TransactionType;
use tally_db::repositories::CategoryRepoError;
use tally_db::{CategoryRepository, FundRepository, TransactionRepository};

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_new_category_sorts_first_within_kind() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());

    let rent = create_category(&db, "Rent", CategoryKind::Expense, dec!(1500)).await;
    let food = create_category(&db, "Food", CategoryKind::Expense, dec!(400)).await;
    let salary = create_category(&db, "Salary", CategoryKind::SALARY, dec!(5000)).await;

    assert_eq!(rent.sort_order, -1);
    assert_eq!(food.sort_order, -2);
    assert_eq!(salary.sort_order, -1);

    let expenses = repo.list_categories(Some(CategoryType::Expense)).await.unwrap();
    let names: Vec<_> = expenses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Rent"]);
}

#[tokio::test]
async fn test_duplicate_category_name_rejected() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    create_category(&db, "Rent", CategoryKind::Expense, dec!(0)).await;

    let err = repo
        .create_category(NewCategory {
            name: "Rent".to_string(),
            kind: CategoryKind::Fund,
            parent_category: None,
            default_budget: dec!(0),
            is_custom: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CategoryRepoError::Category(CategoryError::DuplicateName)));
}

#[tokio::test]
async fn test_category_parent_must_exist_for_type() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    repo.create_group("Pay", CategoryKind::SALARY).await.unwrap();

    let missing = repo
        .create_category(NewCategory {
            name: "Rent".to_string(),
            kind: CategoryKind::Expense,
            parent_category: Some("Pay".to_string()),
            default_budget: dec!(0),
            is_custom: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(missing, CategoryRepoError::Category(CategoryError::GroupMissing)));

    // Deductions may join an income group.
    let tax = repo
        .create_category(NewCategory {
            name: "Tax Deduction".to_string(),
            kind: CategoryKind::DEDUCTION,
            parent_category: Some("Pay".to_string()),
            default_budget: dec!(0),
            is_custom: true,
        })
        .await
        .unwrap();
    assert_eq!(tax.parent_category.as_deref(), Some("Pay"));
}

#[tokio::test]
async fn test_delete_category_cascades() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    let tx_repo = TransactionRepository::new(db.clone());
    let rent = create_category(&db, "Rent", CategoryKind::Expense, dec!(0)).await;
    tx_repo
        .create_transaction(draft(&rent, TransactionType::Expense, dec!(100), date(2024, 3, 1)))
        .await
        .unwrap();

    repo.delete_category(rent.id).await.unwrap();

    assert!(tx_repo.list_all().await.unwrap().is_empty());
    assert!(matches!(
        repo.get_category(rent.id).await,
        Err(CategoryRepoError::Category(CategoryError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_renaming_fund_category_renames_fund() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    let funds = FundRepository::new(db.clone());
    let input = FundInput {
        name: Some("Vacation".to_string()),
        goal_amount: Some(json!(1000)),
        ..Default::default()
    };
    let fund = funds
        .create_fund(FundService::validate_new(&input).unwrap())
        .await
        .unwrap();
    let category = repo
        .list_categories(Some(CategoryType::Fund))
        .await
        .unwrap()
        .remove(0);

    repo.update_category(
        category.id,
        CategoryPatch {
            name: Some("Holiday".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(funds.get_fund(fund.id).await.unwrap().name, "Holiday");
}

#[tokio::test]
async fn test_reorder_and_bulk_defaults() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    let rent = create_category(&db, "Rent", CategoryKind::Expense, dec!(0)).await;
    let food = create_category(&db, "Food", CategoryKind::Expense, dec!(0)).await;

    repo.reorder_categories(&[
        SortOrderUpdate { id: rent.id.into_inner(), sort_order: 0 },
        SortOrderUpdate { id: food.id.into_inner(), sort_order: 1 },
        SortOrderUpdate { id: 999, sort_order: 5 },
    ])
    .await
    .unwrap();
    let names: Vec<_> = repo
        .list_categories(None)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Rent", "Food"]);

    repo.update_all_defaults(&[
        DefaultBudgetUpdate { category_id: rent.id.into_inner(), amount: json!("1500") },
        DefaultBudgetUpdate { category_id: 999, amount: json!(1) },
    ])
    .await
    .unwrap();
    assert_eq!(repo.get_category(rent.id).await.unwrap().default_budget, dec!(1500));

    let err = repo
        .update_all_defaults(&[
            DefaultBudgetUpdate { category_id: food.id.into_inner(), amount: json!(300) },
            DefaultBudgetUpdate { category_id: rent.id.into_inner(), amount: json!(-1) },
        ])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid amount for Rent: Amount cannot be negative");
    // The whole batch was rolled back.
    assert_eq!(repo.get_category(food.id).await.unwrap().default_budget, dec!(0));
}

#[tokio::test]
async fn test_shared_sort_order_lists_by_name() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    let rent = create_category(&db, "Rent", CategoryKind::Expense, dec!(0)).await;
    let food = create_category(&db, "Food", CategoryKind::Expense, dec!(0)).await;
    let travel = create_category(&db, "Travel", CategoryKind::Expense, dec!(0)).await;

    repo.reorder_categories(&[
        SortOrderUpdate { id: travel.id.into_inner(), sort_order: 1 },
        SortOrderUpdate { id: rent.id.into_inner(), sort_order: 1 },
        SortOrderUpdate { id: food.id.into_inner(), sort_order: 2 },
    ])
    .await
    .unwrap();
    repo.update_category(food.id, CategoryPatch { sort_order: Some(1), ..CategoryPatch::default() })
        .await
        .unwrap();

    let names: Vec<_> = repo
        .list_categories(Some(CategoryType::Expense))
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Food", "Rent", "Travel"]);
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn test_group_rename_moves_members() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    let group = repo.create_group("Housing", CategoryKind::Expense).await.unwrap();
    let rent = repo
        .create_category(NewCategory {
            name: "Rent".to_string(),
            kind: CategoryKind::Expense,
            parent_category: Some("Housing".to_string()),
            default_budget: dec!(0),
            is_custom: true,
        })
        .await
        .unwrap();

    let renamed = repo.rename_group(group.id, Some("Home")).await.unwrap();
    assert_eq!(renamed.name, "Home");
    assert_eq!(
        repo.get_category(rent.id).await.unwrap().parent_category.as_deref(),
        Some("Home")
    );

    assert!(matches!(
        repo.rename_group(group.id, Some("  ")).await,
        Err(CategoryRepoError::Category(CategoryError::GroupNameRequired))
    ));
}

#[tokio::test]
async fn test_group_rename_leaves_same_named_income_group_alone() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    let pay = repo.create_group("Pay", CategoryKind::SALARY).await.unwrap();
    repo.create_group("Pay", CategoryKind::DEDUCTION).await.unwrap();
    let mut filed = Vec::new();
    for (name, kind) in [("Gross Salary", CategoryKind::SALARY), ("Tax Deduction", CategoryKind::DEDUCTION)] {
        let category = repo
            .create_category(NewCategory {
                name: name.to_string(),
                kind,
                parent_category: Some("Pay".to_string()),
                default_budget: dec!(0),
                is_custom: true,
            })
            .await
            .unwrap();
        filed.push(category.id);
    }

    repo.rename_group(pay.id, Some("Earnings")).await.unwrap();

    let salary = repo.get_category(filed[0]).await.unwrap();
    let deduction = repo.get_category(filed[1]).await.unwrap();
    assert_eq!(salary.parent_category.as_deref(), Some("Earnings"));
    assert_eq!(deduction.parent_category.as_deref(), Some("Pay"));
}

#[tokio::test]
async fn test_duplicate_group_rejected_per_kind() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    repo.create_group("Misc", CategoryKind::Expense).await.unwrap();

    assert!(matches!(
        repo.create_group("Misc", CategoryKind::Expense).await,
        Err(CategoryRepoError::Category(CategoryError::DuplicateGroup))
    ));
    assert!(repo.create_group("Misc", CategoryKind::Fund).await.is_ok());
}

#[tokio::test]
async fn test_group_delete_clears_members() {
    let db = setup_db().await;
    let repo = CategoryRepository::new(db.clone());
    let group = repo.create_group("Housing", CategoryKind::Expense).await.unwrap();
    let rent = repo
        .create_category(NewCategory {
            name: "Rent".to_string(),
            kind: CategoryKind::Expense,
            parent_category: Some("Housing".to_string()),
            default_budget: dec!(0),
            is_custom: true,
        })
        .await
        .unwrap();

    repo.delete_group(group.id).await.unwrap();

    assert!(repo.list_groups(None).await.unwrap().is_empty());
    assert_eq!(repo.get_category(rent.id).await.unwrap().parent_category, None);
}
