//! Default data for a fresh database.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set,
    TransactionTrait,
};
use tally_core::category::CategoryKind;
use tally_core::import::{DEFAULT_KEYWORDS, UNCATEGORIZED};

use crate::entities::{categories, category_groups, category_keywords};
use crate::repositories::keyword::upsert_keyword;

/// Starter categories: name, kind and group.
pub const DEFAULT_CATEGORIES: &[(&str, CategoryKind, &str)] = &[
    ("Gross Salary", CategoryKind::SALARY, "Income"),
    ("401k Deduction", CategoryKind::DEDUCTION, "Deductions"),
    ("Health Insurance Deduction", CategoryKind::DEDUCTION, "Deductions"),
    ("Federal Tax Deduction", CategoryKind::DEDUCTION, "Deductions"),
    ("State Tax Deduction", CategoryKind::DEDUCTION, "Deductions"),
    ("Social Security Deduction", CategoryKind::DEDUCTION, "Deductions"),
    ("Medicare Deduction", CategoryKind::DEDUCTION, "Deductions"),
    ("Rent/Mortgage", CategoryKind::Expense, "Housing"),
    ("Groceries", CategoryKind::Expense, "Food"),
    ("Gas", CategoryKind::Expense, "Transportation"),
    ("Utilities", CategoryKind::Expense, "Housing"),
    ("Internet", CategoryKind::Expense, "Housing"),
    ("Phone", CategoryKind::Expense, "Personal"),
    (UNCATEGORIZED, CategoryKind::Expense, "Other"),
];

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Categories inserted.
    pub categories: usize,
    /// Groups inserted.
    pub groups: usize,
    /// Keyword mappings inserted.
    pub keywords: usize,
}

/// Seeds default categories, their groups and the merchant keywords.
///
/// Each table is only seeded while it is empty, so running this again is a
/// no-op.
///
/// # Errors
///
/// Returns an error if a database operation fails; nothing is stored then.
pub async fn seed_defaults(db: &DatabaseConnection) -> Result<SeedReport, DbErr> {
    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    if categories::Entity::find().count(&txn).await? == 0 {
        for (sort_order, (name, kind, group)) in (0..).zip(DEFAULT_CATEGORIES) {
            categories::ActiveModel {
                name: Set((*name).to_string()),
                kind: Set(kind.key().to_string()),
                parent_category: Set(Some((*group).to_string())),
                default_budget: Set(Decimal::ZERO),
                sort_order: Set(sort_order),
                is_custom: Set(false),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            report.categories += 1;
        }
    }

    if category_groups::Entity::find().count(&txn).await? == 0 {
        let mut seen: Vec<(&str, CategoryKind)> = Vec::new();
        for (_, kind, group) in DEFAULT_CATEGORIES {
            if !seen.contains(&(*group, *kind)) {
                seen.push((*group, *kind));
            }
        }
        for (sort_order, (name, kind)) in (0..).zip(seen) {
            category_groups::ActiveModel {
                name: Set(name.to_string()),
                kind: Set(kind.key().to_string()),
                sort_order: Set(sort_order),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            report.groups += 1;
        }
    }

    if category_keywords::Entity::find().count(&txn).await? == 0 {
        for (keyword, category) in DEFAULT_KEYWORDS {
            upsert_keyword(&txn, keyword, category).await?;
            report.keywords += 1;
        }
    }

    txn.commit().await?;
    tracing::info!(
        categories = report.categories,
        groups = report.groups,
        keywords = report.keywords,
        "Default data seeded"
    );
    Ok(report)
}
