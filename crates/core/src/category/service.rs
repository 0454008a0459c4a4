//! Category partitioning, grouping and write validation.

use rust_decimal::Decimal;

use super::error::CategoryError;
use super::types::{
    CategoryGroup, CategoryKind, CategorySection, CategoryType, Classified, IncomeKind, KindBuckets,
    OTHER_GROUP,
};
use crate::validation::{AmountError, parse_amount};

/// Category service for business logic.
pub struct CategoryService;

impl CategoryService {
    /// Splits items into income, deduction, expense and fund buckets.
    ///
    /// Every item lands in exactly one bucket; input order is preserved.
    #[must_use]
    pub fn partition<T: Classified>(items: &[T]) -> KindBuckets<'_, T> {
        let mut buckets = KindBuckets {
            income: Vec::new(),
            deductions: Vec::new(),
            expenses: Vec::new(),
            funds: Vec::new(),
        };
        for item in items {
            match item.kind() {
                CategoryKind::Income(IncomeKind::Salary) => buckets.income.push(item),
                CategoryKind::Income(IncomeKind::Deduction) => buckets.deductions.push(item),
                CategoryKind::Expense => buckets.expenses.push(item),
                CategoryKind::Fund => buckets.funds.push(item),
            }
        }
        buckets
    }

    /// Groups the items of one category type into display sections.
    ///
    /// Groups partition by coarse type, so an income group may hold both salary
    /// and deduction categories. Sections follow the order of `groups` (only
    /// groups of `category_type` are used).
    /// An item joins the group whose name equals its `parent_category`;
    /// everything else is collected into a trailing "Other" section, which is
    /// omitted when empty.
    #[must_use]
    pub fn group_by_parent<'a, T: Classified>(
        items: &'a [T],
        groups: &[CategoryGroup],
        category_type: CategoryType,
    ) -> Vec<CategorySection<'a, T>> {
        let mut sections: Vec<CategorySection<'a, T>> = groups
            .iter()
            .filter(|group| group.kind.category_type() == category_type)
            .map(|group| CategorySection {
                group_id: Some(group.id),
                name: group.name.clone(),
                members: Vec::new(),
            })
            .collect();
        let mut other = CategorySection {
            group_id: None,
            name: OTHER_GROUP.to_string(),
            members: Vec::new(),
        };

        for item in items
            .iter()
            .filter(|item| item.kind().category_type() == category_type)
        {
            let section = item
                .parent_category()
                .and_then(|parent| sections.iter_mut().find(|s| s.name == parent));
            match section {
                Some(section) => section.members.push(item),
                None => other.members.push(item),
            }
        }

        if !other.members.is_empty() {
            sections.push(other);
        }
        sections
    }

    /// Sort order for a new row: one below the current minimum, so it shows first.
    #[must_use]
    pub fn next_sort_order(existing: impl IntoIterator<Item = i32>) -> i32 {
        existing.into_iter().min().unwrap_or(0) - 1
    }

    /// Validates and trims a category name.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NameRequired` if the name is blank.
    pub fn validate_name(name: Option<&str>) -> Result<String, CategoryError> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(CategoryError::NameRequired),
        }
    }

    /// Validates one entry of a bulk default-budget update.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::InvalidAmountFor` naming the category.
    pub fn validate_default_budget(
        category_name: &str,
        amount: &serde_json::Value,
    ) -> Result<Decimal, CategoryError> {
        parse_amount(amount).map_err(|source: AmountError| CategoryError::InvalidAmountFor {
            name: category_name.to_string(),
            source,
        })
    }
}
