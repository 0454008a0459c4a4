//! Category error types.

use tally_shared::types::{CategoryGroupId, CategoryId};
use thiserror::Error;

use crate::validation::AmountError;

/// Category and category group errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// Category name missing or blank.
    #[error("Category name is required")]
    NameRequired,

    /// Category type missing.
    #[error("Category type is required")]
    TypeRequired,

    /// Category type is not one of the known kinds.
    #[error("Invalid category type: {0}")]
    InvalidType(String),

    /// Another category already uses this name.
    #[error("Category with this name already exists")]
    DuplicateName,

    /// Referenced group does not exist for the category's kind.
    #[error("Group does not exist")]
    GroupMissing,

    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// Group name or type missing on create.
    #[error("Name and type required")]
    GroupFieldsRequired,

    /// Group name missing on rename.
    #[error("Name required")]
    GroupNameRequired,

    /// A group with this name already exists for the kind.
    #[error("Group already exists")]
    DuplicateGroup,

    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(CategoryGroupId),

    /// Invalid amount in a bulk default-budget update.
    #[error("Invalid amount for {name}: {source}")]
    InvalidAmountFor {
        /// Category name.
        name: String,
        /// Underlying amount failure.
        source: AmountError,
    },

    /// Invalid budget amount.
    #[error(transparent)]
    Amount(#[from] AmountError),
}
