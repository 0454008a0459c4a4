//! Calendar month key (`YYYY-MM`).
//!
//! Budgets, comparisons, dashboards and the ledger filter are all scoped to a
//! month. The month travels as an explicit `YearMonth` value instead of
//! ambient state.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a `YYYY-MM` key cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid month format: {0}")]
pub struct MonthParseError(pub String);

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, returning `None` when `month` is outside `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following month.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Half-open date range `[first day, first day of next month)`.
    #[must_use]
    pub fn date_range(self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.next().first_day())
    }

    /// Whether `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Signed number of calendar months from `self` to `other`.
    ///
    /// Day of month is ignored: Jan 31 to Feb 1 is one month.
    #[must_use]
    pub fn months_until(self, other: Self) -> i32 {
        #[allow(clippy::cast_possible_wrap)]
        let delta_months = other.month as i32 - self.month as i32;
        (other.year - self.year) * 12 + delta_months
    }

    /// Every month from `start` to `end`, both inclusive. Empty when `start > end`.
    pub fn range_inclusive(start: Self, end: Self) -> impl Iterator<Item = Self> {
        let mut current = Some(start);
        std::iter::from_fn(move || {
            let month = current.filter(|m| *m <= end)?;
            current = Some(month.next());
            Some(month)
        })
    }

    /// Long label, e.g. `March 2024`.
    #[must_use]
    pub fn long_label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Short label, e.g. `Mar 2024`.
    #[must_use]
    pub fn short_label(self) -> String {
        self.first_day().format("%b %Y").to_string()
    }

    /// Three letter month name, e.g. `Mar`.
    #[must_use]
    pub fn abbreviation(self) -> String {
        self.first_day().format("%b").to_string()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
