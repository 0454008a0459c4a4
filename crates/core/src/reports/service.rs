//! Report generation service.
//!
//! Every report is computed from the transactions of its date range, already
//! joined with their categories. "Outflow" in the spending reports means
//! ordinary spending plus payroll deductions; fund contributions are savings
//! and are reported separately.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tally_shared::YearMonth;

use super::error::ReportError;
use super::types::{
    AnnualOverview, CategoryAnalysis, CategoryShare, FundProgressReport, MonthlySummary,
    PeriodComparison, PeriodSeries, SankeyGraph, SankeyLink, SankeyNode, SankeyNodeType,
    SankeyPeriod, SpendingTrends, Trend,
};
use crate::fund::{Fund, FundService};
use crate::ledger::{FlowRole, TransactionRow};
use crate::money;
use crate::validation::AmountError;

/// Days looked back by the default spending trend range.
const TREND_LOOKBACK_DAYS: u64 = 180;

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Parses a four digit year.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidYear` for anything else.
    pub fn parse_year(text: &str) -> Result<i32, ReportError> {
        let trimmed = text.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReportError::InvalidYear(trimmed.to_string()));
        }
        trimmed
            .parse()
            .map_err(|_| ReportError::InvalidYear(trimmed.to_string()))
    }

    /// Half-open date range covering a calendar year.
    #[must_use]
    pub fn year_range(year: i32) -> (NaiveDate, NaiveDate) {
        let first = YearMonth::new(year, 1).map_or(NaiveDate::MIN, YearMonth::first_day);
        let next = YearMonth::new(year + 1, 1).map_or(NaiveDate::MAX, YearMonth::first_day);
        (first, next)
    }

    /// Monthly summary with per-category breakdowns.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a total overflows.
    pub fn monthly_summary(month: YearMonth, rows: &[TransactionRow]) -> Result<MonthlySummary, ReportError> {
        let mut income = BTreeMap::new();
        let mut deductions = BTreeMap::new();
        let mut expenses = BTreeMap::new();
        let mut savings = BTreeMap::new();

        for row in rows.iter().filter(|r| month.contains(r.date)) {
            let (bucket, key) = match row.role() {
                FlowRole::GrossIncome => (&mut income, row.category.as_str()),
                FlowRole::Deduction => (&mut deductions, row.category.as_str()),
                FlowRole::Saving => (&mut savings, row.category.as_str()),
                FlowRole::Spending => (&mut expenses, row.group_or_category()),
                FlowRole::Withdrawal => continue,
            };
            let slot = bucket.entry(key.to_string()).or_insert(Decimal::ZERO);
            *slot = money::add(*slot, row.amount)?;
        }

        let gross_income = money::total(income.values().copied())?;
        let total_deductions = money::total(deductions.values().copied())?;
        let net_income = money::sub(gross_income, total_deductions)?;
        let total_expenses = money::total(expenses.values().copied())?;
        let total_savings = money::total(savings.values().copied())?;

        Ok(MonthlySummary {
            month: month.long_label(),
            income_breakdown: income,
            deduction_breakdown: deductions,
            expense_breakdown: expenses,
            savings_breakdown: savings,
            gross_income,
            deductions: total_deductions,
            net_income,
            total_expenses,
            total_savings,
            savings_rate: money::percent(total_savings, net_income)?,
            leftover: money::sub(net_income, money::add(total_expenses, total_savings)?)?,
        })
    }

    /// Income and outflow per month from January up to the month containing `today`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a total overflows.
    pub fn annual_overview(
        year: i32,
        rows: &[TransactionRow],
        today: NaiveDate,
    ) -> Result<AnnualOverview, ReportError> {
        let mut overview = AnnualOverview {
            year,
            months: Vec::new(),
            monthly_income: Vec::new(),
            monthly_expenses: Vec::new(),
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            total_saved: Decimal::ZERO,
        };
        let months = (1..=12)
            .filter_map(|m| YearMonth::new(year, m))
            .take_while(|m| m.first_day() <= today);

        for month in months {
            let in_month = || rows.iter().filter(move |r| month.contains(r.date));
            let income = money::total(
                in_month()
                    .filter(|r| r.role() == FlowRole::GrossIncome)
                    .map(|r| r.amount),
            )?;
            let outflow = money::total(
                in_month()
                    .filter(|r| r.role().is_spending_outflow())
                    .map(|r| r.amount),
            )?;
            overview.months.push(month.abbreviation());
            overview.monthly_income.push(income);
            overview.monthly_expenses.push(outflow);
            overview.total_income = money::add(overview.total_income, income)?;
            overview.total_expenses = money::add(overview.total_expenses, outflow)?;
        }
        overview.total_saved = money::sub(overview.total_income, overview.total_expenses)?;
        Ok(overview)
    }

    /// Outflow by group (or category when ungrouped), largest first.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a total overflows.
    pub fn category_analysis(month: YearMonth, rows: &[TransactionRow]) -> Result<CategoryAnalysis, ReportError> {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for row in rows
            .iter()
            .filter(|r| month.contains(r.date) && r.role().is_spending_outflow())
        {
            let slot = totals.entry(row.group_or_category()).or_insert(Decimal::ZERO);
            *slot = money::add(*slot, row.amount)?;
        }
        let total = money::total(totals.values().copied())?;

        let mut categories = totals
            .into_iter()
            .map(|(name, amount)| -> Result<CategoryShare, AmountError> {
                Ok(CategoryShare {
                    name: name.to_string(),
                    amount,
                    percentage: money::percent(amount, total)?,
                })
            })
            .collect::<Result<Vec<_>, AmountError>>()?;
        categories.sort_by(|a, b| b.amount.cmp(&a.amount));

        Ok(CategoryAnalysis {
            month: month.to_string(),
            categories,
            total,
        })
    }

    /// Month range for the spending trend report.
    ///
    /// Uses `start`..`end` when both are given, otherwise the months from
    /// roughly six months ago through the current month.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidMonth` for a malformed month.
    pub fn trend_range(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<(YearMonth, YearMonth), ReportError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        match (present(start), present(end)) {
            (Some(start), Some(end)) => Ok((start.parse()?, end.parse()?)),
            _ => {
                let start = today
                    .checked_sub_days(Days::new(TREND_LOOKBACK_DAYS))
                    .unwrap_or(today);
                Ok((YearMonth::from_date(start), YearMonth::from_date(today)))
            }
        }
    }

    /// Outflow per month from `start` to `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a monthly total overflows.
    pub fn outflow_series(
        start: YearMonth,
        end: YearMonth,
        rows: &[TransactionRow],
    ) -> Result<PeriodSeries, ReportError> {
        let mut by_month: HashMap<YearMonth, Decimal> = HashMap::new();
        for row in rows.iter().filter(|r| r.role().is_spending_outflow()) {
            let slot = by_month
                .entry(YearMonth::from_date(row.date))
                .or_insert(Decimal::ZERO);
            *slot = money::add(*slot, row.amount)?;
        }
        let mut series = PeriodSeries::default();
        for month in YearMonth::range_inclusive(start, end) {
            series.months.push(month.short_label());
            series
                .totals
                .push(by_month.get(&month).copied().unwrap_or(Decimal::ZERO));
        }
        Ok(series)
    }

    /// Spending trend over a month range.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a total overflows.
    pub fn spending_trends(
        start: YearMonth,
        end: YearMonth,
        rows: &[TransactionRow],
    ) -> Result<SpendingTrends, ReportError> {
        let PeriodSeries { months, totals } = Self::outflow_series(start, end, rows)?;

        let average_spending = Self::mean(&totals)?;
        let highest = totals
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, Decimal)>, (i, &amount)| match best {
                Some((_, top)) if top >= amount => best,
                _ => Some((i, amount)),
            });
        let (highest_month, highest_amount) = highest
            .and_then(|(i, amount)| months.get(i).map(|label| (label.clone(), amount)))
            .unwrap_or_default();

        Ok(SpendingTrends {
            trend: Self::trend(&totals)?,
            months,
            expenses: totals,
            average_spending,
            highest_month,
            highest_amount,
        })
    }

    /// Compares the last two months with the months before them.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a mean overflows.
    pub fn trend(totals: &[Decimal]) -> Result<Trend, ReportError> {
        let Some(split) = totals.len().checked_sub(2) else {
            return Ok(Trend::InsufficientData);
        };
        let (older, recent) = totals.split_at(split);
        let older_mean = if older.is_empty() {
            recent[0]
        } else {
            Self::mean(older)?
        };
        if Self::mean(recent)? > older_mean {
            Ok(Trend::Increasing)
        } else {
            Ok(Trend::Decreasing)
        }
    }

    /// Parses the four bounds of a period comparison.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::MissingDateRange` unless all four are present,
    /// and `ReportError::InvalidMonth` for a malformed month.
    pub fn comparison_bounds(bounds: [Option<&str>; 4]) -> Result<[YearMonth; 4], ReportError> {
        let present = bounds.map(|raw| raw.map(str::trim).filter(|v| !v.is_empty()));
        let [Some(start1), Some(end1), Some(start2), Some(end2)] = present else {
            return Err(ReportError::MissingDateRange);
        };
        Ok([start1.parse()?, end1.parse()?, start2.parse()?, end2.parse()?])
    }

    /// Outflow series for two periods.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a monthly total overflows.
    pub fn period_comparison(
        [start1, end1, start2, end2]: [YearMonth; 4],
        rows: &[TransactionRow],
    ) -> Result<PeriodComparison, ReportError> {
        Ok(PeriodComparison {
            period1: Self::outflow_series(start1, end1, rows)?,
            period2: Self::outflow_series(start2, end2, rows)?,
        })
    }

    /// Progress of every fund.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a fund figure overflows.
    pub fn fund_progress(funds: &[Fund], today: NaiveDate) -> Result<FundProgressReport, ReportError> {
        Ok(FundProgressReport {
            funds: funds
                .iter()
                .map(|fund| FundService::summarize(fund, today))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Flow graph: income into the budget, and out to deductions, groups and categories.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Amount` when a link value overflows.
    pub fn sankey(rows: &[TransactionRow]) -> Result<SankeyGraph, ReportError> {
        let mut builder = SankeyBuilder::default();
        let budget = builder.node("budget", "Budget", SankeyNodeType::Budget);

        for row in rows {
            let category_key = format!("cat:{}", row.category);
            match row.role() {
                FlowRole::GrossIncome => {
                    let income = builder.node(&category_key, &row.category, SankeyNodeType::Income);
                    builder.link(income, budget, row.amount)?;
                }
                FlowRole::Deduction => {
                    let deduction =
                        builder.node(&category_key, &row.category, SankeyNodeType::Deduction);
                    builder.link(budget, deduction, row.amount)?;
                }
                role @ (FlowRole::Spending | FlowRole::Saving) => {
                    let group_name = row
                        .parent_category
                        .as_deref()
                        .unwrap_or(crate::category::OTHER_GROUP);
                    let group = builder.node(
                        &format!("group:{group_name}"),
                        group_name,
                        SankeyNodeType::Group,
                    );
                    let node_type = if role == FlowRole::Saving {
                        SankeyNodeType::Fund
                    } else {
                        SankeyNodeType::Expense
                    };
                    let category = builder.node(&category_key, &row.category, node_type);
                    builder.link(budget, group, row.amount)?;
                    builder.link(group, category, row.amount)?;
                }
                FlowRole::Withdrawal => {}
            }
        }
        Ok(builder.graph)
    }

    fn mean(values: &[Decimal]) -> Result<Decimal, AmountError> {
        if values.is_empty() {
            return Ok(Decimal::ZERO);
        }
        money::divide(money::total(values.iter().copied())?, Decimal::from(values.len()))
    }
}

impl SankeyPeriod {
    /// Date range for a period key; `None` means the period containing `today`.
    ///
    /// Monthly keys are `YYYY-MM`; annual keys are `YYYY` or `YYYY-MM`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed key.
    pub fn range(self, key: Option<&str>, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ReportError> {
        let key = key.map(str::trim).filter(|k| !k.is_empty());
        match self {
            Self::Monthly => {
                let month = match key {
                    Some(key) => key.parse()?,
                    None => YearMonth::from_date(today),
                };
                Ok(month.date_range())
            }
            Self::Annual => {
                let year = match key {
                    Some(key) if key.contains('-') => key.parse::<YearMonth>()?.year(),
                    Some(key) => ReportService::parse_year(key)?,
                    None => YearMonth::from_date(today).year(),
                };
                Ok(ReportService::year_range(year))
            }
        }
    }
}

impl FromStr for SankeyPeriod {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "monthly" => Ok(Self::Monthly),
            "annual" => Ok(Self::Annual),
            other => Err(ReportError::InvalidPeriod(other.to_string())),
        }
    }
}

#[derive(Default)]
struct SankeyBuilder {
    graph: SankeyGraph,
    nodes: HashMap<String, usize>,
    links: HashMap<(usize, usize), usize>,
}

impl SankeyBuilder {
    fn node(&mut self, key: &str, name: &str, node_type: SankeyNodeType) -> usize {
        if let Some(&index) = self.nodes.get(key) {
            return index;
        }
        let index = self.graph.nodes.len();
        self.graph.nodes.push(SankeyNode {
            name: name.to_string(),
            node_type,
        });
        self.nodes.insert(key.to_string(), index);
        index
    }

    fn link(&mut self, source: usize, target: usize, value: Decimal) -> Result<(), AmountError> {
        match self.links.get(&(source, target)) {
            Some(&index) => {
                if let Some(link) = self.graph.links.get_mut(index) {
                    link.value = money::add(link.value, value)?;
                }
            }
            None => {
                self.links.insert((source, target), self.graph.links.len());
                self.graph.links.push(SankeyLink {
                    source,
                    target,
                    value,
                });
            }
        }
        Ok(())
    }
}
