//! `SeaORM` Entity for categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// `income`, `deduction`, `expense` or `fund`.
    pub kind: String,
    pub parent_category: Option<String>,
    pub default_budget: Decimal,
    pub sort_order: i32,
    pub is_custom: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::budget_overrides::Entity")]
    BudgetOverrides,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budget_overrides::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetOverrides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
