//! Transaction primitives.
//!
//! A [`Transaction`] is a single signed movement on the line of credit:
//! positive amounts repay principal, negative amounts draw on it.

use std::cmp::Ordering;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::{Clock, EngineError, MoneyCents, ResultEngine};

/// When a transaction happens, either as a calendar date or as a number of
/// days since the line of credit was opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionDate {
    Absolute(NaiveDate),
    OffsetDays(i64),
}

impl TransactionDate {
    /// Today, according to `clock`.
    pub fn today(clock: &impl Clock) -> Self {
        Self::Absolute(clock.today())
    }

    /// Resolves the date against the opening date of a line of credit.
    ///
    /// Negative offsets resolve to dates before `opened_at`; rejecting those
    /// is up to the caller.
    pub fn resolve(self, opened_at: NaiveDate) -> ResultEngine<NaiveDate> {
        match self {
            Self::Absolute(date) => Ok(date),
            Self::OffsetDays(days) => {
                let delta = Days::new(days.unsigned_abs());
                let resolved = if days < 0 {
                    opened_at.checked_sub_days(delta)
                } else {
                    opened_at.checked_add_days(delta)
                };
                resolved.ok_or_else(|| {
                    EngineError::InvalidDate(format!(
                        "{days} days from {opened_at} is out of range"
                    ))
                })
            }
        }
    }
}

impl From<NaiveDate> for TransactionDate {
    fn from(value: NaiveDate) -> Self {
        Self::Absolute(value)
    }
}

impl From<i64> for TransactionDate {
    fn from(value: i64) -> Self {
        Self::OffsetDays(value)
    }
}

/// A recorded ledger movement.
///
/// `sequence` is the position of the transaction in its ledger. Ordering is by
/// date first and sequence second, so equal-date transactions keep the order
/// they were submitted in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    amount: MoneyCents,
    date: NaiveDate,
    sequence: usize,
}

impl Transaction {
    pub(crate) fn new(amount: MoneyCents, date: NaiveDate, sequence: usize) -> ResultEngine<Self> {
        if amount.is_zero() {
            return Err(EngineError::InvalidAmount(
                "you must enter a non-zero amount".to_string(),
            ));
        }
        Ok(Self {
            amount,
            date,
            sequence,
        })
    }

    pub fn amount(&self) -> MoneyCents {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// `true` for repayments, `false` for draws.
    pub fn is_payment(&self) -> bool {
        self.amount.is_positive()
    }
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.date, self.sequence).cmp(&(other.date, other.sequence))
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
