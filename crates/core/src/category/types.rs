//! Category data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CategoryGroupId, CategoryId};

use super::error::CategoryError;

/// Kind of income category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKind {
    /// Gross pay and other money coming in.
    Salary,
    /// Subtraction from gross pay (tax, benefits, retirement).
    Deduction,
}

/// Category kind.
///
/// On the wire a kind is the pair `{"type": "income" | "expense" | "fund",
/// "is_deduction": bool}`; in storage it is a single key (see [`CategoryKind::key`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "KindFields", try_from = "KindFields")]
pub enum CategoryKind {
    /// Income category.
    Income(IncomeKind),
    /// Spending category.
    Expense,
    /// Savings fund category.
    Fund,
}

/// Coarse category type as exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Income (salary or deduction).
    Income,
    /// Expense.
    Expense,
    /// Fund.
    Fund,
}

impl CategoryType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Fund => "fund",
        }
    }

    /// Kinds reported under this type.
    #[must_use]
    pub const fn kinds(self) -> &'static [CategoryKind] {
        match self {
            Self::Income => &INCOME_KINDS,
            Self::Expense => &[CategoryKind::Expense],
            Self::Fund => &[CategoryKind::Fund],
        }
    }

    /// Parses a type filter; any storage key is accepted (`deduction` selects income).
    #[must_use]
    pub fn from_filter(text: &str) -> Option<Self> {
        CategoryKind::from_key(text).map(CategoryKind::category_type)
    }
}

const INCOME_KINDS: [CategoryKind; 2] = [CategoryKind::SALARY, CategoryKind::DEDUCTION];

/// Substring that marks legacy income rows as deductions.
const DEDUCTION_MARKER: &str = "deduction";

impl CategoryKind {
    /// Salary income.
    pub const SALARY: Self = Self::Income(IncomeKind::Salary);
    /// Deduction from gross pay.
    pub const DEDUCTION: Self = Self::Income(IncomeKind::Deduction);

    /// Every kind, in display order.
    pub const ALL: [Self; 4] = [Self::SALARY, Self::DEDUCTION, Self::Expense, Self::Fund];

    /// Storage key: `income`, `deduction`, `expense` or `fund`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Income(IncomeKind::Salary) => "income",
            Self::Income(IncomeKind::Deduction) => "deduction",
            Self::Expense => "expense",
            Self::Fund => "fund",
        }
    }

    /// Parses a storage key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::SALARY),
            "deduction" => Some(Self::DEDUCTION),
            "expense" => Some(Self::Expense),
            "fund" => Some(Self::Fund),
            _ => None,
        }
    }

    /// Coarse type exposed to clients (a deduction reports as income).
    #[must_use]
    pub const fn category_type(self) -> CategoryType {
        match self {
            Self::Income(_) => CategoryType::Income,
            Self::Expense => CategoryType::Expense,
            Self::Fund => CategoryType::Fund,
        }
    }

    /// Whether this is a deduction from gross pay.
    #[must_use]
    pub const fn is_deduction(self) -> bool {
        matches!(self, Self::Income(IncomeKind::Deduction))
    }

    /// Whether this is salary income (the only kind where exceeding budget is good).
    #[must_use]
    pub const fn is_salary(self) -> bool {
        matches!(self, Self::Income(IncomeKind::Salary))
    }

    /// Resolves the kind of a category or group being written.
    ///
    /// `type_name` may be any storage key. When `is_deduction` is absent an
    /// `income` row whose name contains "deduction" (any case) is classified as
    /// a deduction; this is the only place that naming convention is consulted.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::TypeRequired` for a blank type and
    /// `CategoryError::InvalidType` for an unknown one.
    pub fn classify(
        type_name: &str,
        is_deduction: Option<bool>,
        name: &str,
    ) -> Result<Self, CategoryError> {
        if type_name.trim().is_empty() {
            return Err(CategoryError::TypeRequired);
        }
        let kind = Self::from_key(type_name)
            .ok_or_else(|| CategoryError::InvalidType(type_name.to_string()))?;
        Ok(match (kind, is_deduction) {
            (Self::Income(IncomeKind::Salary), Some(true)) => Self::DEDUCTION,
            (Self::Income(IncomeKind::Salary), None) if name_marks_deduction(name) => {
                Self::DEDUCTION
            }
            (kind, _) => kind,
        })
    }
}

/// Legacy naming convention for deductions.
#[must_use]
pub fn name_marks_deduction(name: &str) -> bool {
    name.to_lowercase().contains(DEDUCTION_MARKER)
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| CategoryError::InvalidType(s.to_string()))
    }
}

/// Wire representation of a [`CategoryKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindFields {
    /// Coarse type; `deduction` is also accepted on input.
    #[serde(rename = "type")]
    pub category_type: String,
    /// Deduction flag.
    #[serde(default)]
    pub is_deduction: bool,
}

impl From<CategoryKind> for KindFields {
    fn from(kind: CategoryKind) -> Self {
        Self {
            category_type: kind.category_type().as_str().to_string(),
            is_deduction: kind.is_deduction(),
        }
    }
}

impl TryFrom<KindFields> for CategoryKind {
    type Error = CategoryError;

    fn try_from(fields: KindFields) -> Result<Self, Self::Error> {
        let kind: Self = fields.category_type.parse()?;
        Ok(if kind.is_salary() && fields.is_deduction {
            Self::DEDUCTION
        } else {
            kind
        })
    }
}

/// Serde adapter that writes a kind as its single storage key.
pub mod kind_key {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::CategoryKind;

    /// Serializes the storage key.
    pub fn serialize<S: Serializer>(kind: &CategoryKind, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(kind.key())
    }

    /// Deserializes a storage key.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CategoryKind, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(D::Error::custom)
    }
}

/// Anything that belongs to a category kind and optionally a named group.
pub trait Classified {
    /// The kind.
    fn kind(&self) -> CategoryKind;

    /// Group name the item is filed under, if any.
    fn parent_category(&self) -> Option<&str> {
        None
    }
}

/// A budget category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Unique name.
    pub name: String,
    /// Kind (serialized as `type` + `is_deduction`).
    #[serde(flatten)]
    pub kind: CategoryKind,
    /// Name of the group this category is filed under.
    pub parent_category: Option<String>,
    /// Budget used for months without an override.
    pub default_budget: Decimal,
    /// Display order (ascending).
    pub sort_order: i32,
    /// Whether the user created it (seeded defaults are not custom).
    pub is_custom: bool,
}

impl Classified for Category {
    fn kind(&self) -> CategoryKind {
        self.kind
    }

    fn parent_category(&self) -> Option<&str> {
        self.parent_category.as_deref()
    }
}

/// A named group of categories of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Group ID.
    pub id: CategoryGroupId,
    /// Group name, unique per kind.
    pub name: String,
    /// Kind shared by all member categories.
    #[serde(flatten)]
    pub kind: CategoryKind,
    /// Display order (ascending).
    pub sort_order: i32,
}

/// Display name of the synthetic group collecting unmatched categories.
pub const OTHER_GROUP: &str = "Other";

/// One display section: a persisted group or the synthetic "Other" group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySection<'a, T> {
    /// Group ID; `None` for "Other".
    pub group_id: Option<CategoryGroupId>,
    /// Group name.
    pub name: String,
    /// Member items in input order.
    pub members: Vec<&'a T>,
}

impl<T> CategorySection<'_, T> {
    /// Whether this is the synthetic "Other" section.
    #[must_use]
    pub const fn is_other(&self) -> bool {
        self.group_id.is_none()
    }
}

/// Items split into the four summary buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindBuckets<'a, T> {
    /// Salary income.
    pub income: Vec<&'a T>,
    /// Deductions.
    pub deductions: Vec<&'a T>,
    /// Expenses.
    pub expenses: Vec<&'a T>,
    /// Funds.
    pub funds: Vec<&'a T>,
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Name (trimmed, non-empty).
    pub name: String,
    /// Kind.
    pub kind: CategoryKind,
    /// Group name.
    pub parent_category: Option<String>,
    /// Default monthly budget.
    pub default_budget: Decimal,
    /// Whether the user created it.
    pub is_custom: bool,
}

/// Partial update of a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    /// New name.
    pub name: Option<String>,
    /// New group (`Some(None)` clears it).
    pub parent_category: Option<Option<String>>,
    /// New default budget.
    pub default_budget: Option<Decimal>,
    /// New sort order.
    pub sort_order: Option<i32>,
}

/// One entry of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrderUpdate {
    /// Row ID.
    pub id: i32,
    /// New sort order.
    #[serde(default)]
    pub sort_order: i32,
}

/// One entry of a bulk default-budget update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultBudgetUpdate {
    /// Category ID; unknown IDs are skipped.
    pub category_id: i32,
    /// New default budget, as a number or numeric string.
    #[serde(default)]
    pub amount: serde_json::Value,
}
