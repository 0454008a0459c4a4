//! Fund progress, recommended contributions and balance effects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tally_shared::YearMonth;

use super::error::FundError;
use super::types::{BalanceEffect, Fund, FundInput, FundMovement, FundPatch, FundPreview, FundSummary, NewFund};
use crate::ledger::TransactionType;
use crate::money;
use crate::validation::{AmountError, parse_amount, parse_iso_date, parse_optional_amount};

/// Number of funds in the compact dashboard view.
pub const PREVIEW_LIMIT: usize = 3;

/// Fund service for business logic.
pub struct FundService;

impl FundService {
    /// Progress toward the goal in percent, unclamped. Zero without a goal.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the ratio overflows.
    pub fn progress(balance: Decimal, goal: Decimal) -> Result<Decimal, AmountError> {
        money::percent(balance, goal)
    }

    /// Calendar months from `today` to the goal date, floored at zero.
    ///
    /// `None` when the fund has no goal date.
    #[must_use]
    pub fn months_remaining(goal_date: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
        goal_date.map(|goal| {
            let months = YearMonth::from_date(today).months_until(YearMonth::from_date(goal));
            u32::try_from(months).unwrap_or(0)
        })
    }

    /// Monthly contribution needed to reach the goal by its date.
    ///
    /// Zero when there is no goal or goal date, when the date has passed, or
    /// when the goal is already met.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the shortfall overflows.
    pub fn recommended_contribution(fund: &Fund, today: NaiveDate) -> Result<Decimal, AmountError> {
        let Some(goal_date) = fund.goal_date else {
            return Ok(Decimal::ZERO);
        };
        if fund.goal <= Decimal::ZERO || goal_date <= today {
            return Ok(Decimal::ZERO);
        }
        let months = YearMonth::from_date(today).months_until(YearMonth::from_date(goal_date));
        if months <= 0 {
            return Ok(Decimal::ZERO);
        }
        let shortfall = money::sub(fund.goal, fund.balance)?;
        Ok(money::divide(shortfall, Decimal::from(months))?.max(Decimal::ZERO))
    }

    /// Derives the display figures for a fund.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when a derived figure overflows.
    pub fn summarize(fund: &Fund, today: NaiveDate) -> Result<FundSummary, AmountError> {
        let progress = Self::progress(fund.balance, fund.goal)?;
        Ok(FundSummary {
            id: fund.id,
            name: fund.name.clone(),
            goal: fund.goal,
            goal_date: fund.goal_date,
            balance: fund.balance,
            progress,
            bar_width: progress.min(Decimal::ONE_HUNDRED).max(Decimal::ZERO),
            months_remaining: Self::months_remaining(fund.goal_date, today),
            monthly_contribution: fund.monthly_contribution,
            recommended_contribution: Self::recommended_contribution(fund, today)?,
        })
    }

    /// First `limit` funds plus the number left out.
    #[must_use]
    pub fn preview(funds: &[FundSummary], limit: usize) -> FundPreview<'_> {
        let shown = &funds[..funds.len().min(limit)];
        FundPreview {
            shown,
            hidden: funds.len() - shown.len(),
        }
    }

    /// Effect of a transaction booked to a fund's category.
    ///
    /// Expenses and contributions add to the balance; withdrawals subtract;
    /// income does not touch it.
    #[must_use]
    pub const fn effect_of(tx_type: TransactionType, amount: Decimal) -> Option<BalanceEffect> {
        match tx_type {
            TransactionType::Expense | TransactionType::FundContribution => {
                Some(BalanceEffect::Contribution(amount))
            }
            TransactionType::FundWithdrawal => Some(BalanceEffect::Withdrawal(amount)),
            TransactionType::Income => None,
        }
    }

    /// Applies an effect to a balance.
    ///
    /// # Errors
    ///
    /// Returns `FundError::InsufficientBalance` when a withdrawal exceeds the
    /// balance and `FundError::Amount` when the new balance overflows.
    pub fn apply(balance: Decimal, effect: BalanceEffect) -> Result<Decimal, FundError> {
        match effect {
            BalanceEffect::Contribution(amount) => Ok(money::add(balance, amount)?),
            BalanceEffect::Withdrawal(amount) if amount > balance => {
                Err(FundError::InsufficientBalance)
            }
            BalanceEffect::Withdrawal(amount) => Ok(money::sub(balance, amount)?),
        }
    }

    /// Undoes a previously applied effect.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the balance overflows.
    pub fn revert(balance: Decimal, effect: BalanceEffect) -> Result<Decimal, AmountError> {
        match effect {
            BalanceEffect::Contribution(amount) => money::sub(balance, amount),
            BalanceEffect::Withdrawal(amount) => money::add(balance, amount),
        }
    }

    /// Rebuilds a balance from the fund category's transactions.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::OutOfRange` when the balance overflows.
    pub fn recompute_balance<I>(transactions: I) -> Result<Decimal, AmountError>
    where
        I: IntoIterator<Item = (TransactionType, Decimal)>,
    {
        transactions
            .into_iter()
            .filter_map(|(tx_type, amount)| Self::effect_of(tx_type, amount))
            .try_fold(Decimal::ZERO, |balance, effect| match effect {
                BalanceEffect::Contribution(amount) => money::add(balance, amount),
                BalanceEffect::Withdrawal(amount) => money::sub(balance, amount),
            })
    }

    /// Validates a new fund.
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a `FundError`.
    pub fn validate_new(input: &FundInput) -> Result<NewFund, FundError> {
        let name = Self::validate_name(input.name.as_deref())?;
        let goal = field("Goal amount", parse_optional_amount(input.goal_amount.as_ref()))?;
        let balance = field(
            "Current balance",
            parse_optional_amount(input.current_balance.as_ref()),
        )?;
        let monthly_contribution = field(
            "Monthly contribution",
            parse_optional_amount(input.monthly_contribution.as_ref()),
        )?;
        let goal_date = parse_goal_date(input.goal_date.as_ref())?.flatten();
        Ok(NewFund {
            name,
            goal,
            goal_date,
            balance,
            monthly_contribution,
        })
    }

    /// Validates a fund update; only supplied fields are checked.
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a `FundError`.
    pub fn validate_patch(input: &FundInput) -> Result<FundPatch, FundError> {
        let name = input
            .name
            .as_deref()
            .map(|name| Self::validate_name(Some(name)))
            .transpose()?;
        let goal = input
            .goal_amount
            .as_ref()
            .map(|v| field("Goal amount", parse_amount(v)))
            .transpose()?;
        let monthly_contribution = input
            .monthly_contribution
            .as_ref()
            .map(|v| field("Monthly contribution", parse_amount(v)))
            .transpose()?;
        Ok(FundPatch {
            name,
            goal,
            goal_date: parse_goal_date(input.goal_date.as_ref())?,
            monthly_contribution,
        })
    }

    /// Validates the amount of a contribution or withdrawal.
    ///
    /// # Errors
    ///
    /// Returns `FundError::Amount` for a missing, negative or non-numeric amount.
    pub fn validate_movement(movement: &FundMovement) -> Result<Decimal, FundError> {
        Ok(parse_amount(movement.amount.as_ref().unwrap_or(&Value::Null))?)
    }

    fn validate_name(name: Option<&str>) -> Result<String, FundError> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(FundError::NameRequired),
        }
    }
}

fn field(name: &'static str, result: Result<Decimal, AmountError>) -> Result<Decimal, FundError> {
    result.map_err(|source| FundError::InvalidField { field: name, source })
}

/// `None` when absent, `Some(None)` when cleared, `Some(Some(date))` when set.
fn parse_goal_date(raw: Option<&Option<String>>) -> Result<Option<Option<NaiveDate>>, FundError> {
    match raw {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(text)) if text.trim().is_empty() => Ok(Some(None)),
        Some(Some(text)) => Ok(Some(Some(parse_iso_date(text)?))),
    }
}
