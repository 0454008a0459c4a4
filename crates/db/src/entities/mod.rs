//! `SeaORM` entity definitions.

pub mod budget_overrides;
pub mod categories;
pub mod category_groups;
pub mod category_keywords;
pub mod funds;
pub mod settings;
pub mod transactions;

pub mod prelude {
    //! Entity aliases.
    pub use super::budget_overrides::Entity as BudgetOverrides;
    pub use super::categories::Entity as Categories;
    pub use super::category_groups::Entity as CategoryGroups;
    pub use super::category_keywords::Entity as CategoryKeywords;
    pub use super::funds::Entity as Funds;
    pub use super::settings::Entity as Settings;
    pub use super::transactions::Entity as Transactions;
}
