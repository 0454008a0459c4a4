//! Property-based tests for category partitioning and grouping.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{CategoryGroupId, CategoryId};

use super::service::CategoryService;
use super::types::{Category, CategoryGroup, CategoryKind, CategoryType};

fn kind_strategy() -> impl Strategy<Value = CategoryKind> {
    prop::sample::select(CategoryKind::ALL.to_vec())
}

fn categories_strategy() -> impl Strategy<Value = Vec<Category>> {
    prop::collection::vec((kind_strategy(), prop::option::of(0usize..4)), 0..30).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (kind, parent))| {
                let id = i32::try_from(i).unwrap_or(i32::MAX);
                Category {
                    id: CategoryId::new(id),
                    name: format!("Category {i}"),
                    kind,
                    parent_category: parent.map(|p| format!("Group {p}")),
                    default_budget: Decimal::ZERO,
                    sort_order: id,
                    is_custom: true,
                }
            })
            .collect()
    })
}

proptest! {
    /// Every category lands in exactly one bucket.
    #[test]
    fn test_partition_is_exhaustive_and_disjoint(categories in categories_strategy()) {
        let buckets = CategoryService::partition(&categories);
        let total = buckets.income.len()
            + buckets.deductions.len()
            + buckets.expenses.len()
            + buckets.funds.len();
        prop_assert_eq!(total, categories.len());
        prop_assert!(buckets.income.iter().all(|c| c.kind.is_salary()));
        prop_assert!(buckets.deductions.iter().all(|c| c.kind.is_deduction()));
    }

    /// Grouping never loses or duplicates a category of the requested type.
    #[test]
    fn test_grouping_preserves_members(
        categories in categories_strategy(),
        kind in kind_strategy(),
    ) {
        let category_type: CategoryType = kind.category_type();
        let groups: Vec<CategoryGroup> = (0..3)
            .map(|i| CategoryGroup {
                id: CategoryGroupId::new(i),
                name: format!("Group {i}"),
                kind,
                sort_order: i,
            })
            .collect();

        let sections = CategoryService::group_by_parent(&categories, &groups, category_type);
        let grouped: usize = sections.iter().map(|s| s.members.len()).sum();
        let expected = categories
            .iter()
            .filter(|c| c.kind.category_type() == category_type)
            .count();
        prop_assert_eq!(grouped, expected);

        for section in &sections {
            for member in &section.members {
                if section.is_other() {
                    prop_assert!(member.parent_category.as_deref() != Some("Group 0"));
                    prop_assert!(member.parent_category.as_deref() != Some("Group 1"));
                    prop_assert!(member.parent_category.as_deref() != Some("Group 2"));
                } else {
                    prop_assert_eq!(member.parent_category.as_deref(), Some(section.name.as_str()));
                }
            }
        }
    }

    /// A new row always sorts before every existing row.
    #[test]
    fn test_next_sort_order_is_minimum(orders in prop::collection::vec(-1000i32..1000, 0..20)) {
        let next = CategoryService::next_sort_order(orders.clone());
        prop_assert!(orders.iter().all(|o| next < *o));
    }
}
