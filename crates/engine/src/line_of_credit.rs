//! The module contains the representation of a revolving line of credit.
use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::{
    Apr, Clock, EngineError, MoneyCents, ResultEngine, Transaction, TransactionDate,
    interest::accrued_interest,
};

/// APR, in percent, used when none is given.
pub const DEFAULT_APR_PERCENT: f64 = 35.0;

/// Length of one billing period in days.
pub const DAYS_PER_PERIOD: i64 = 30;

/// A revolving line of credit.
///
/// `principal` is the part of `limit` that has not been drawn. It starts equal
/// to `limit`, draws lower it and payments raise it again. The ledger is
/// append-only and its dates never go backwards.
///
/// The invariant `0 <= principal <= limit` holds after construction and after
/// every accepted transaction.
///
/// ** Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use engine::{LineOfCredit, MoneyCents, TransactionDate};
///
/// let opened = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut line = LineOfCredit::new(MoneyCents::from_major(1000), 36.5, opened).unwrap();
///
/// line.withdraw(MoneyCents::from_major(500), TransactionDate::OffsetDays(0)).unwrap();
/// line.pay(MoneyCents::from_major(200), TransactionDate::OffsetDays(10)).unwrap();
///
/// assert_eq!(line.owed(), MoneyCents::from_major(300));
/// assert_eq!(line.amount_owed(1).unwrap(), MoneyCents::from_major(311));
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct LineOfCredit {
    limit: MoneyCents,
    principal: MoneyCents,
    apr: Apr,
    opened_at: NaiveDate,
    ledger: Vec<Transaction>,
}

impl LineOfCredit {
    /// Return a builder for `LineOfCredit`, defaulting APR and opening date.
    pub fn builder(limit: MoneyCents) -> LineOfCreditBuilder {
        LineOfCreditBuilder {
            limit,
            apr_percent: DEFAULT_APR_PERCENT,
            opened_at: None,
        }
    }

    /// Opens a line of credit on `opened_at`.
    ///
    /// `apr_percent` is a percentage: `35.0` is stored as `0.35`.
    pub fn new(limit: MoneyCents, apr_percent: f64, opened_at: NaiveDate) -> ResultEngine<Self> {
        if !limit.is_positive() {
            return Err(EngineError::InvalidLimit(limit));
        }
        let apr = Apr::from_percentage(apr_percent)?;

        Ok(Self {
            limit,
            principal: limit,
            apr,
            opened_at,
            ledger: Vec::new(),
        })
    }

    /// Opens a line of credit today, according to `clock`.
    pub fn open(limit: MoneyCents, apr_percent: f64, clock: &impl Clock) -> ResultEngine<Self> {
        Self::new(limit, apr_percent, clock.today())
    }

    pub fn limit(&self) -> MoneyCents {
        self.limit
    }

    pub fn principal(&self) -> MoneyCents {
        self.principal
    }

    /// Credit still available to draw. Same value as `principal`.
    pub fn available(&self) -> MoneyCents {
        self.principal
    }

    pub fn apr(&self) -> Apr {
        self.apr
    }

    pub fn opened_at(&self) -> NaiveDate {
        self.opened_at
    }

    /// Recorded transactions, in submission order.
    pub fn ledger(&self) -> &[Transaction] {
        &self.ledger
    }

    /// Amount currently drawn, interest excluded.
    pub fn owed(&self) -> MoneyCents {
        self.limit - self.principal
    }

    fn latest_date(&self) -> Option<NaiveDate> {
        self.ledger.iter().map(Transaction::date).max()
    }

    /// Records a signed movement: positive amounts repay, negative amounts
    /// draw.
    ///
    /// This is the only method that mutates the line. Everything is checked
    /// before principal or ledger change, in this order: date out of range,
    /// zero amount, date before opening, date before the latest ledger entry,
    /// overpayment, overdraw.
    pub fn add_transaction(
        &mut self,
        amount: MoneyCents,
        date: impl Into<TransactionDate>,
    ) -> ResultEngine<&Transaction> {
        let date = date.into().resolve(self.opened_at)?;
        let transaction = Transaction::new(amount, date, self.ledger.len())?;

        if date < self.opened_at {
            return Err(EngineError::DateBeforeOpening {
                date,
                opened_at: self.opened_at,
            });
        }
        if let Some(latest) = self.latest_date()
            && date < latest
        {
            return Err(EngineError::NonMonotonicDate { date, latest });
        }

        let principal = self
            .principal
            .checked_add(amount)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        if principal > self.limit {
            return Err(EngineError::ExceedsLimit {
                amount,
                owed: self.owed(),
            });
        }
        if principal.is_negative() {
            return Err(EngineError::InsufficientBalance {
                amount: -amount,
                available: self.principal,
            });
        }

        self.principal = principal;
        self.ledger.push(transaction);
        Ok(&self.ledger[self.ledger.len() - 1])
    }

    /// Draws `amount` from the line.
    pub fn withdraw(
        &mut self,
        amount: MoneyCents,
        date: impl Into<TransactionDate>,
    ) -> ResultEngine<&Transaction> {
        if amount > self.principal {
            return Err(EngineError::InsufficientPrincipal {
                amount,
                principal: self.principal,
            });
        }
        let draw = amount
            .checked_neg()
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        self.add_transaction(draw, date)
    }

    /// Repays `amount`.
    pub fn pay(
        &mut self,
        amount: MoneyCents,
        date: impl Into<TransactionDate>,
    ) -> ResultEngine<&Transaction> {
        self.add_transaction(amount, date)
    }

    /// Date interest is integrated up to: `period_in_months` periods of 30
    /// days after opening.
    pub fn horizon(&self, period_in_months: i64) -> ResultEngine<NaiveDate> {
        if period_in_months <= 0 {
            return Err(EngineError::InvalidPeriod(period_in_months));
        }
        let days = period_in_months
            .checked_mul(DAYS_PER_PERIOD)
            .ok_or(EngineError::InvalidPeriod(period_in_months))?;
        self.opened_at
            .checked_add_days(Days::new(days.unsigned_abs()))
            .ok_or_else(|| {
                EngineError::InvalidDate(format!(
                    "{period_in_months} periods after {} is out of range",
                    self.opened_at
                ))
            })
    }

    /// Amount owed, interest included, at the end of `period_in_months`
    /// periods.
    ///
    /// Only interest is cut at the horizon: `owed()` already reflects every
    /// recorded transaction. Interest is rounded to the cent once, at the end.
    pub fn amount_owed(&self, period_in_months: i64) -> ResultEngine<MoneyCents> {
        let as_of = self.horizon(period_in_months)?;
        let interest = accrued_interest(self.opened_at, self.apr, self.ordered_ledger(), as_of);
        self.owed()
            .checked_add(MoneyCents::from_cents_f64(interest)?)
            .ok_or_else(|| {
                EngineError::InvalidAmount(format!(
                    "amount owed after {period_in_months} periods is out of range"
                ))
            })
    }

    /// Snapshot of the line projected to the end of `period_in_months`.
    pub fn statement(&self, period_in_months: i64) -> ResultEngine<Statement> {
        Ok(Statement {
            limit: self.limit,
            principal: self.principal,
            owed: self.owed(),
            apr_percent: self.apr.percentage(),
            opened_at: self.opened_at,
            period_in_months,
            horizon: self.horizon(period_in_months)?,
            amount_owed: self.amount_owed(period_in_months)?,
            transactions: self.ordered_ledger().into_iter().cloned().collect(),
        })
    }

    /// Ledger sorted by date; `sort` is stable and ties fall back to
    /// `sequence`.
    fn ordered_ledger(&self) -> Vec<&Transaction> {
        let mut ordered: Vec<&Transaction> = self.ledger.iter().collect();
        ordered.sort();
        ordered
    }
}

/// The builder for `LineOfCredit`.
#[derive(Clone, Debug)]
pub struct LineOfCreditBuilder {
    limit: MoneyCents,
    apr_percent: f64,
    opened_at: Option<NaiveDate>,
}

impl LineOfCreditBuilder {
    /// APR in percent. Defaults to [`DEFAULT_APR_PERCENT`].
    pub fn apr(mut self, apr_percent: f64) -> Self {
        self.apr_percent = apr_percent;
        self
    }

    /// Opening date. Defaults to today according to the clock given to
    /// [`build`](Self::build).
    pub fn opened_at(mut self, opened_at: NaiveDate) -> Self {
        self.opened_at = Some(opened_at);
        self
    }

    /// Construct `LineOfCredit`
    pub fn build(self, clock: &impl Clock) -> ResultEngine<LineOfCredit> {
        let opened_at = self.opened_at.unwrap_or_else(|| clock.today());
        LineOfCredit::new(self.limit, self.apr_percent, opened_at)
    }
}

/// A line of credit projected to a horizon. Amounts are in cents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Statement {
    pub limit: MoneyCents,
    pub principal: MoneyCents,
    pub owed: MoneyCents,
    pub apr_percent: f64,
    pub opened_at: NaiveDate,
    pub period_in_months: i64,
    pub horizon: NaiveDate,
    pub amount_owed: MoneyCents,
    pub transactions: Vec<Transaction>,
}
