//! Keyword categorization of merchants.

use super::error::ImportError;

/// Category assigned when no keyword matches.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Keyword mappings seeded into a new database, in match order.
pub const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("GROCERY", "Groceries"),
    ("WALMART", "Groceries"),
    ("KROGER", "Groceries"),
    ("SAFEWAY", "Groceries"),
    ("WHOLE FOODS", "Groceries"),
    ("TRADER JOE", "Groceries"),
    ("COSTCO", "Groceries"),
    ("ALDI", "Groceries"),
    ("TARGET", "Groceries"),
    ("PUBLIX", "Groceries"),
    ("CVS", "Pharmacy"),
    ("WALGREENS", "Pharmacy"),
    ("RITE AID", "Pharmacy"),
    ("STARBUCKS", "Coffee"),
    ("DUNKIN", "Coffee"),
    ("MCDONALD", "Fast Food"),
    ("BURGER KING", "Fast Food"),
    ("CHICK-FIL-A", "Fast Food"),
    ("TACO BELL", "Fast Food"),
    ("SUBWAY", "Fast Food"),
    ("PIZZA HUT", "Dining"),
    ("DOMINOS", "Dining"),
    ("UBER EATS", "Dining"),
    ("DOORDASH", "Dining"),
    ("GRUBHUB", "Dining"),
    ("EXXON", "Gas"),
    ("SHELL", "Gas"),
    ("CHEVRON", "Gas"),
    ("BP", "Gas"),
    ("SUNOCO", "Gas"),
    ("7-ELEVEN", "Gas"),
    ("UBER", "Transportation"),
    ("LYFT", "Transportation"),
    ("RENT", "Rent/Mortgage"),
    ("MORTGAGE", "Rent/Mortgage"),
    ("APARTMENTS", "Rent/Mortgage"),
    ("LEASE", "Rent/Mortgage"),
    ("UTILITIES", "Utilities"),
    ("ELECTRIC", "Utilities"),
    ("WATER", "Utilities"),
    ("GAS CO", "Utilities"),
    ("COMCAST", "Internet"),
    ("XFINITY", "Internet"),
    ("SPECTRUM", "Internet"),
    ("VERIZON", "Phone"),
    ("AT&T", "Phone"),
    ("T-MOBILE", "Phone"),
    ("SPRINT", "Phone"),
    ("NETFLIX", "Entertainment"),
    ("HULU", "Entertainment"),
    ("SPOTIFY", "Entertainment"),
    ("DISNEY+", "Entertainment"),
    ("ADOBE", "Subscriptions"),
    ("GITHUB", "Subscriptions"),
    ("PATREON", "Donations"),
    ("AMAZON", "Shopping"),
    ("EBAY", "Shopping"),
    ("APPLE", "Shopping"),
    ("BEST BUY", "Electronics"),
    ("IKEA", "Home Improvement"),
    ("HOME DEPOT", "Home Improvement"),
    ("LOWES", "Home Improvement"),
    ("GAMESTOP", "Entertainment"),
    ("DELTA", "Travel"),
    ("UNITED", "Travel"),
    ("AMERICAN AIRLINES", "Travel"),
    ("SOUTHWEST", "Travel"),
    ("MARRIOTT", "Travel"),
    ("HILTON", "Travel"),
    ("HOLIDAY INN", "Travel"),
    ("AIRBNB", "Travel"),
    ("PAYPAL", "Finance"),
    ("VENMO", "Finance"),
    ("SQUARE", "Finance"),
    ("INTUIT", "Finance"),
    ("INSURANCE", "Insurance"),
    ("PROGRESSIVE", "Insurance"),
    ("GEICO", "Insurance"),
    ("STATE FARM", "Insurance"),
    ("ALLSTATE", "Insurance"),
    ("HOSPITAL", "Healthcare"),
    ("MEDICAL", "Healthcare"),
    ("DENTAL", "Healthcare"),
    ("PHARMACY", "Pharmacy"),
    ("CHARITY", "Donations"),
    ("TAX", "Taxes"),
    ("IRS", "Taxes"),
    ("GOVERNMENT", "Government"),
    ("COLLEGE", "Education"),
    ("UNIVERSITY", "Education"),
    ("BOOKS", "Education"),
];

/// Ordered keyword to category mapping; the first matching keyword wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordCategorizer {
    keywords: Vec<(String, String)>,
}

impl KeywordCategorizer {
    /// Builds a categorizer; keywords are upper-cased.
    pub fn new<I, K, C>(keywords: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: AsRef<str>,
        C: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|(keyword, category)| (keyword.as_ref().to_uppercase(), category.into()))
                .collect(),
        }
    }

    /// Categorizer over [`DEFAULT_KEYWORDS`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }

    /// Category of the first keyword contained in `merchant` (case-insensitive).
    #[must_use]
    pub fn categorize(&self, merchant: &str) -> Option<&str> {
        let upper = merchant.to_uppercase();
        self.keywords
            .iter()
            .find(|(keyword, _)| upper.contains(keyword.as_str()))
            .map(|(_, category)| category.as_str())
    }

    /// Like [`categorize`](Self::categorize), falling back to "Uncategorized".
    #[must_use]
    pub fn categorize_or_default(&self, merchant: &str) -> &str {
        self.categorize(merchant).unwrap_or(UNCATEGORIZED)
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether there are no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Validates a new keyword mapping, returning the upper-cased keyword and trimmed category.
///
/// # Errors
///
/// Returns `ImportError::KeywordFieldsRequired` when either is blank.
pub fn validate_keyword(
    keyword: Option<&str>,
    category: Option<&str>,
) -> Result<(String, String), ImportError> {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }
    match (present(keyword), present(category)) {
        (Some(keyword), Some(category)) => Ok((keyword.to_uppercase(), category.to_string())),
        _ => Err(ImportError::KeywordFieldsRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let categorizer = KeywordCategorizer::with_defaults();
        assert_eq!(categorizer.categorize("UBER EATS 1234"), Some("Dining"));
        assert_eq!(categorizer.categorize("UBER TRIP"), Some("Transportation"));
        assert_eq!(categorizer.categorize("starbucks store"), Some("Coffee"));
        assert_eq!(categorizer.categorize("LOCAL BAKERY"), None);
        assert_eq!(categorizer.categorize_or_default("LOCAL BAKERY"), UNCATEGORIZED);
    }

    #[test]
    fn test_custom_keywords_are_upper_cased() {
        let categorizer = KeywordCategorizer::new([("bakery", "Dining")]);
        assert_eq!(categorizer.categorize("Local Bakery"), Some("Dining"));
        assert_eq!(categorizer.len(), 1);
    }

    #[test]
    fn test_validate_keyword() {
        assert_eq!(
            validate_keyword(Some(" bakery "), Some("Dining")).unwrap(),
            ("BAKERY".to_string(), "Dining".to_string())
        );
        assert_eq!(
            validate_keyword(Some("bakery"), Some(" ")).unwrap_err().to_string(),
            "keyword and category required"
        );
    }
}
