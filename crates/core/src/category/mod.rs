//! Category store logic: kinds, partitioning into summary buckets, and
//! grouping under named category groups.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::CategoryError;
pub use service::CategoryService;
pub use types::{
    Category, CategoryGroup, CategoryKind, CategoryPatch, CategorySection, CategoryType,
    Classified, DefaultBudgetUpdate, IncomeKind, KindBuckets, KindFields, NewCategory,
    OTHER_GROUP, SortOrderUpdate, kind_key, name_marks_deduction,
};
