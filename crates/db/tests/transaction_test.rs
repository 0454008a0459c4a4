//! Integration tests for the transaction repository.

mod common;

use common::{create_category, date, draft, setup_db};
use rust_decimal_macros::dec;
use serde_json::json;
use tally_core::category::CategoryKind;
use tally_core::fund::{FundError, FundInput, FundService};
use tally_core::import::{KeywordCategorizer, plan_import, read_statement};
use tally_core::ledger::{TransactionError, TransactionFilter, TransactionPatch, TransactionType};
use tally_db::repositories::TransactionRepoError;
use tally_db::{CategoryRepository, FundRepository, TransactionRepository};
use tally_shared::types::{TransactionId, YearMonth};

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_filters_and_orders_newest_first() {
    let db = setup_db().await;
    let repo = TransactionRepository::new(db.clone());
    let food = create_category(&db, "Groceries", CategoryKind::Expense, dec!(0)).await;
    let salary = create_category(&db, "Salary", CategoryKind::SALARY, dec!(0)).await;

    let mut coffee = draft(&food, TransactionType::Expense, dec!(4.5), date(2024, 3, 2));
    coffee.merchant = "Corner Cafe".to_string();
    repo.create_transaction(coffee).await.unwrap();
    repo.create_transaction(draft(&food, TransactionType::Expense, dec!(80), date(2024, 3, 20)))
        .await
        .unwrap();
    repo.create_transaction(draft(&salary, TransactionType::Income, dec!(5000), date(2024, 3, 1)))
        .await
        .unwrap();
    repo.create_transaction(draft(&food, TransactionType::Expense, dec!(60), date(2024, 4, 1)))
        .await
        .unwrap();

    let march = TransactionFilter {
        month: Some(YearMonth::new(2024, 3).unwrap()),
        ..Default::default()
    };
    let rows = repo.list_transactions(&march).await.unwrap();
    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 20), date(2024, 3, 2), date(2024, 3, 1)]);

    let expenses = TransactionFilter {
        transaction_type: Some(TransactionType::Expense),
        ..march.clone()
    };
    assert_eq!(repo.list_transactions(&expenses).await.unwrap().len(), 2);

    let search = TransactionFilter {
        search: Some("corner".to_string()),
        ..Default::default()
    };
    let found = repo.list_transactions(&search).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, "Groceries");
    assert_eq!(found[0].category_kind, CategoryKind::Expense);
}

#[tokio::test]
async fn test_recent_and_range() {
    let db = setup_db().await;
    let repo = TransactionRepository::new(db.clone());
    let food = create_category(&db, "Groceries", CategoryKind::Expense, dec!(0)).await;
    for day in 1..=12 {
        repo.create_transaction(draft(&food, TransactionType::Expense, dec!(1), date(2024, 5, day)))
            .await
            .unwrap();
    }

    let recent = repo.recent(10).await.unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].date, date(2024, 5, 12));

    let range = repo.list_between(date(2024, 5, 3), date(2024, 5, 5)).await.unwrap();
    let dates: Vec<_> = range.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2024, 5, 3), date(2024, 5, 4)]);
}

#[tokio::test]
async fn test_missing_transaction_and_category() {
    let db = setup_db().await;
    let repo = TransactionRepository::new(db.clone());
    let food = create_category(&db, "Groceries", CategoryKind::Expense, dec!(0)).await;

    assert!(matches!(
        repo.get_transaction(TransactionId::new(42)).await,
        Err(TransactionRepoError::Transaction(TransactionError::NotFound(_)))
    ));

    let mut orphan = draft(&food, TransactionType::Expense, dec!(1), date(2024, 1, 1));
    orphan.category_id = 999.into();
    assert!(matches!(
        repo.create_transaction(orphan).await,
        Err(TransactionRepoError::Transaction(TransactionError::InvalidCategory))
    ));
}

// ============================================================================
// Fund effects
// ============================================================================

async fn vacation_fund(db: &sea_orm::DatabaseConnection) -> tally_core::fund::Fund {
    let input = FundInput {
        name: Some("Vacation".to_string()),
        goal_amount: Some(json!(2000)),
        monthly_contribution: Some(json!(100)),
        ..Default::default()
    };
    FundRepository::new(db.clone())
        .create_fund(FundService::validate_new(&input).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_fund_category_transactions_move_balance() {
    let db = setup_db().await;
    let repo = TransactionRepository::new(db.clone());
    let funds = FundRepository::new(db.clone());
    let fund = vacation_fund(&db).await;
    let category = CategoryRepository::new(db.clone())
        .list_categories(None)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Vacation")
        .unwrap();

    let deposit = repo
        .create_transaction(draft(&category, TransactionType::Expense, dec!(300), date(2024, 2, 1)))
        .await
        .unwrap();
    assert_eq!(funds.get_fund(fund.id).await.unwrap().balance, dec!(300));

    repo.update_transaction(
        deposit.id,
        TransactionPatch {
            amount: Some(dec!(250)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(funds.get_fund(fund.id).await.unwrap().balance, dec!(250));

    let overdraw = repo
        .create_transaction(draft(
            &category,
            TransactionType::FundWithdrawal,
            dec!(400),
            date(2024, 2, 2),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        overdraw,
        TransactionRepoError::Transaction(TransactionError::Fund(FundError::InsufficientBalance))
    ));
    assert_eq!(repo.list_all().await.unwrap().len(), 1);

    repo.delete_transaction(deposit.id).await.unwrap();
    assert_eq!(funds.get_fund(fund.id).await.unwrap().balance, dec!(0));
}

#[tokio::test]
async fn test_moving_transaction_off_fund_rolls_back() {
    let db = setup_db().await;
    let repo = TransactionRepository::new(db.clone());
    let funds = FundRepository::new(db.clone());
    let fund = vacation_fund(&db).await;
    let categories = CategoryRepository::new(db.clone());
    let vacation = categories
        .list_categories(None)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Vacation")
        .unwrap();
    let food = create_category(&db, "Groceries", CategoryKind::Expense, dec!(0)).await;

    let row = repo
        .create_transaction(draft(&vacation, TransactionType::Expense, dec!(120), date(2024, 2, 1)))
        .await
        .unwrap();
    repo.update_transaction(
        row.id,
        TransactionPatch {
            category_id: Some(food.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(funds.get_fund(fund.id).await.unwrap().balance, dec!(0));
    assert_eq!(repo.get_transaction(row.id).await.unwrap().category, "Groceries");
}

// ============================================================================
// Import
// ============================================================================

#[tokio::test]
async fn test_import_creates_missing_categories() {
    let db = setup_db().await;
    let repo = TransactionRepository::new(db.clone());
    create_category(&db, "Groceries", CategoryKind::Expense, dec!(0)).await;

    let statement = "Date,Description,Amount\n\
                     03/01/2024,KROGER #123,-54.20\n\
                     03/02/2024,MYSTERY SHOP,-10\n\
                     03/03/2024,PAYROLL,2500\n";
    let rows = read_statement(statement, date(2024, 3, 31)).unwrap();
    let categorizer = KeywordCategorizer::new([("KROGER", "Groceries"), ("PAYROLL", "Paycheck")]);
    let plan = plan_import(&rows, &categorizer);

    let created = repo.import_plan(&plan).await.unwrap();
    assert_eq!(created, 3);

    let categories = CategoryRepository::new(db.clone()).list_categories(None).await.unwrap();
    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"Paycheck"));
    assert!(names.contains(&"Uncategorized"));
    assert!(categories.iter().all(|c| c.kind == CategoryKind::Expense));

    let all = repo.list_all().await.unwrap();
    let payroll = all.iter().find(|r| r.merchant == "PAYROLL").unwrap();
    assert_eq!(payroll.transaction_type, TransactionType::Income);
    assert_eq!(payroll.amount, dec!(2500));
}
