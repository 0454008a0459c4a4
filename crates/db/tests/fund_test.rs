//! Integration tests for the fund repository.

mod common;

use common::{date, draft, setup_db};
use rust_decimal_macros::dec;
use serde_json::json;
use tally_core::category::{CategoryKind, CategoryType};
use tally_core::fund::{Fund, FundError, FundInput, FundService};
use tally_core::ledger::TransactionType;
use tally_db::repositories::{FundRepoError, SAVINGS_GROUP};
use tally_db::{CategoryRepository, FundRepository, TransactionRepository};

async fn create_fund(repo: &FundRepository, name: &str, balance: i64) -> Fund {
    let input = FundInput {
        name: Some(name.to_string()),
        goal_amount: Some(json!(1200)),
        current_balance: Some(json!(balance)),
        monthly_contribution: Some(json!(100)),
        goal_date: Some(Some("2025-06-01".to_string())),
    };
    repo.create_fund(FundService::validate_new(&input).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_fund_adds_category_and_savings_group() {
    let db = setup_db().await;
    let repo = FundRepository::new(db.clone());
    let categories = CategoryRepository::new(db.clone());

    let fund = create_fund(&repo, "Emergency", 0).await;
    assert_eq!(fund.goal_date, Some(date(2025, 6, 1)));

    let fund_categories = categories.list_categories(Some(CategoryType::Fund)).await.unwrap();
    assert_eq!(fund_categories.len(), 1);
    assert_eq!(fund_categories[0].name, "Emergency");
    assert_eq!(fund_categories[0].kind, CategoryKind::Fund);
    assert_eq!(fund_categories[0].default_budget, dec!(100));
    assert_eq!(fund_categories[0].parent_category.as_deref(), Some(SAVINGS_GROUP));

    let groups = categories.list_groups(Some(CategoryType::Fund)).await.unwrap();
    assert_eq!(groups.len(), 1);

    // A second fund reuses the group.
    create_fund(&repo, "Car", 0).await;
    assert_eq!(categories.list_groups(Some(CategoryType::Fund)).await.unwrap().len(), 1);

    let names: Vec<_> = repo.list_funds().await.unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Car", "Emergency"]);
}

#[tokio::test]
async fn test_duplicate_fund_name_rejected() {
    let db = setup_db().await;
    let repo = FundRepository::new(db.clone());
    create_fund(&repo, "Emergency", 0).await;

    let input = FundInput {
        name: Some("Emergency".to_string()),
        ..Default::default()
    };
    let err = repo
        .create_fund(FundService::validate_new(&input).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, FundRepoError::Fund(FundError::DuplicateName)));
    assert_eq!(err.to_string(), "Fund with this name already exists");
}

#[tokio::test]
async fn test_update_fund_renames_category_and_clears_goal_date() {
    let db = setup_db().await;
    let repo = FundRepository::new(db.clone());
    let fund = create_fund(&repo, "Emergency", 0).await;

    let patch = FundService::validate_patch(&FundInput {
        name: Some("Rainy Day".to_string()),
        monthly_contribution: Some(json!(150)),
        goal_date: Some(None),
        ..Default::default()
    })
    .unwrap();
    let updated = repo.update_fund(fund.id, patch).await.unwrap();

    assert_eq!(updated.name, "Rainy Day");
    assert_eq!(updated.goal_date, None);
    assert_eq!(updated.monthly_contribution, dec!(150));

    let category = CategoryRepository::new(db)
        .list_categories(Some(CategoryType::Fund))
        .await
        .unwrap()
        .remove(0);
    assert_eq!(category.name, "Rainy Day");
    assert_eq!(category.default_budget, dec!(150));
}

#[tokio::test]
async fn test_contribute_and_withdraw() {
    let db = setup_db().await;
    let repo = FundRepository::new(db.clone());
    let fund = create_fund(&repo, "Emergency", 50).await;
    let today = date(2024, 6, 15);

    let balance = repo
        .contribute(fund.id, dec!(200), Some("bonus".to_string()), today)
        .await
        .unwrap();
    assert_eq!(balance, dec!(250));

    let err = repo.withdraw(fund.id, dec!(300), None, today).await.unwrap_err();
    assert!(matches!(err, FundRepoError::Fund(FundError::InsufficientBalance)));

    let balance = repo.withdraw(fund.id, dec!(100), None, today).await.unwrap();
    assert_eq!(balance, dec!(150));
    assert_eq!(repo.get_fund(fund.id).await.unwrap().balance, dec!(150));

    let rows = TransactionRepository::new(db).list_all().await.unwrap();
    assert_eq!(rows.len(), 2);
    let contribution = rows
        .iter()
        .find(|r| r.transaction_type == TransactionType::FundContribution)
        .unwrap();
    assert_eq!(contribution.description, "Contribution to Emergency");
    assert_eq!(contribution.notes, "bonus");
    assert_eq!(contribution.date, today);
    assert!(rows.iter().any(|r| r.description == "Withdrawal from Emergency"));
}

#[tokio::test]
async fn test_refresh_rebuilds_balance_from_transactions() {
    let db = setup_db().await;
    let repo = FundRepository::new(db.clone());
    // The opening balance is not backed by any transaction.
    let fund = create_fund(&repo, "Emergency", 500).await;
    let category = CategoryRepository::new(db.clone())
        .list_categories(Some(CategoryType::Fund))
        .await
        .unwrap()
        .remove(0);
    let transactions = TransactionRepository::new(db.clone());
    transactions
        .create_transaction(draft(&category, TransactionType::Expense, dec!(80), date(2024, 1, 5)))
        .await
        .unwrap();
    transactions
        .create_transaction(draft(
            &category,
            TransactionType::FundContribution,
            dec!(40),
            date(2024, 2, 5),
        ))
        .await
        .unwrap();
    transactions
        .create_transaction(draft(
            &category,
            TransactionType::FundWithdrawal,
            dec!(30),
            date(2024, 3, 5),
        ))
        .await
        .unwrap();

    assert_eq!(repo.refresh_balances().await.unwrap(), 1);
    assert_eq!(repo.get_fund(fund.id).await.unwrap().balance, dec!(90));
}

#[tokio::test]
async fn test_delete_fund_cascades() {
    let db = setup_db().await;
    let repo = FundRepository::new(db.clone());
    let fund = create_fund(&repo, "Emergency", 0).await;
    repo.contribute(fund.id, dec!(20), None, date(2024, 1, 1)).await.unwrap();

    repo.delete_fund(fund.id).await.unwrap();

    assert!(repo.list_funds().await.unwrap().is_empty());
    assert!(CategoryRepository::new(db.clone())
        .list_categories(Some(CategoryType::Fund))
        .await
        .unwrap()
        .is_empty());
    assert!(TransactionRepository::new(db).list_all().await.unwrap().is_empty());
    assert!(matches!(
        repo.get_fund(fund.id).await,
        Err(FundRepoError::Fund(FundError::NotFound(_)))
    ));
}
