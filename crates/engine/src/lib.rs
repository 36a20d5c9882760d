//! Revolving line of credit engine.
//!
//! A [`LineOfCredit`] keeps a limit, the principal still available and an
//! append-only ledger of [`Transaction`]s, and projects the amount owed
//! (simple daily interest included) to a future horizon.
//!
//! The engine is synchronous and does no I/O; dates that may be omitted by a
//! caller come from an injected [`Clock`].

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;
pub use interest::Apr;
pub use line_of_credit::{
    DAYS_PER_PERIOD, DEFAULT_APR_PERCENT, LineOfCredit, LineOfCreditBuilder, Statement,
};
pub use money::MoneyCents;
pub use transactions::{Transaction, TransactionDate};

mod clock;
mod error;
mod interest;
mod line_of_credit;
mod money;
mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;
