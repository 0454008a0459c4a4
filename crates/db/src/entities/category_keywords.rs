//! `SeaORM` Entity for category_keywords table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "category_keywords")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Upper-case merchant substring.
    #[sea_orm(unique)]
    pub keyword: String,
    /// Category name.
    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
