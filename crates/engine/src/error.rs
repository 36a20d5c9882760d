//! The module contains the errors the engine can return.
//!
//! Every operation validates its input before touching any state, so an error
//! always leaves the [`LineOfCredit`] exactly as it was.
//!
//! Construction errors are:
//!
//! - [`InvalidLimit`] when the credit limit is not positive.
//! - [`InvalidApr`] when the APR is not a positive, finite percentage.
//!
//! Transaction errors are [`DateBeforeOpening`], [`NonMonotonicDate`],
//! [`ExceedsLimit`], [`InsufficientBalance`] and [`InsufficientPrincipal`].
//!
//!  [`InvalidLimit`]: EngineError::InvalidLimit
//!  [`InvalidApr`]: EngineError::InvalidApr
//!  [`DateBeforeOpening`]: EngineError::DateBeforeOpening
//!  [`NonMonotonicDate`]: EngineError::NonMonotonicDate
//!  [`ExceedsLimit`]: EngineError::ExceedsLimit
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
//!  [`InsufficientPrincipal`]: EngineError::InsufficientPrincipal
//!  [`LineOfCredit`]: crate::LineOfCredit
use chrono::NaiveDate;
use thiserror::Error;

use crate::MoneyCents;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Limit must be a positive amount, got {0}")]
    InvalidLimit(MoneyCents),
    #[error("APR must be a positive number, got {0}")]
    InvalidApr(f64),
    #[error("Period must be a positive number of months, got {0}")]
    InvalidPeriod(i64),
    #[error("Cannot add a transaction on {date}: the line of credit was opened on {opened_at}")]
    DateBeforeOpening {
        date: NaiveDate,
        opened_at: NaiveDate,
    },
    #[error("Cannot add a transaction on {date}: the ledger already has one on {latest}")]
    NonMonotonicDate { date: NaiveDate, latest: NaiveDate },
    #[error("Cannot pay {amount}: only {owed} is owed")]
    ExceedsLimit { amount: MoneyCents, owed: MoneyCents },
    #[error("Cannot draw {amount}: only {available} is available")]
    InsufficientBalance {
        amount: MoneyCents,
        available: MoneyCents,
    },
    #[error("Cannot withdraw {amount}: only {principal} is left on the line")]
    InsufficientPrincipal {
        amount: MoneyCents,
        principal: MoneyCents,
    },
}
