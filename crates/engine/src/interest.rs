//! Daily-accrual interest.
//!
//! Interest is simple (never compounded): each day accrues `owed * apr / 365`
//! on whatever balance was outstanding that day. Between two consecutive
//! transactions the balance is constant, so the integral is a sum of
//! rectangles, one per inter-transaction interval plus a final stub up to the
//! horizon.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{EngineError, MoneyCents, ResultEngine, Transaction};

const DAYS_PER_YEAR: f64 = 365.0;

/// Annual percentage rate, stored as a fraction (`0.35` for 35%).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Apr(f64);

impl Apr {
    /// Builds a rate from a percentage (`35.0` means 35%).
    pub fn from_percentage(percent: f64) -> ResultEngine<Self> {
        if !percent.is_finite() || percent <= 0.0 {
            return Err(EngineError::InvalidApr(percent));
        }
        Ok(Self(percent / 100.0))
    }

    #[must_use]
    pub fn fraction(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn percentage(self) -> f64 {
        self.0 * 100.0
    }

    /// Interest, in fractional cents, accrued by `owed` over `days`.
    fn accrue(self, owed: MoneyCents, days: i64) -> f64 {
        owed.cents() as f64 * self.0 / DAYS_PER_YEAR * days as f64
    }
}

/// Integrates interest from `opened_at` up to `as_of`.
///
/// `transactions` must already be in ledger order (date, then sequence).
/// Transactions dated after `as_of` end the walk. The result is in fractional
/// cents and left unrounded.
pub(crate) fn accrued_interest<'a>(
    opened_at: NaiveDate,
    apr: Apr,
    transactions: impl IntoIterator<Item = &'a Transaction>,
    as_of: NaiveDate,
) -> f64 {
    let mut interest = 0.0;
    let mut current_date = opened_at;
    let mut current_owed = MoneyCents::ZERO;

    for transaction in transactions {
        if transaction.date() > as_of {
            break;
        }

        if transaction.date() != current_date {
            let days = (transaction.date() - current_date).num_days();
            if !current_owed.is_zero() {
                interest += apr.accrue(current_owed, days);
            }
            current_date = transaction.date();
        }
        // A payment lowers what is owed, a draw raises it.
        current_owed -= transaction.amount();
    }

    if current_date != as_of {
        interest += apr.accrue(current_owed, (as_of - current_date).num_days());
    }

    interest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(offset))
            .unwrap()
    }

    fn tx(cents: i64, offset: u64, sequence: usize) -> Transaction {
        Transaction::new(MoneyCents::new(cents), day(offset), sequence).unwrap()
    }

    #[test]
    fn apr_is_stored_as_fraction() {
        let apr = Apr::from_percentage(35.0).unwrap();
        assert!((apr.fraction() - 0.35).abs() < 1e-12);
        assert!((apr.percentage() - 35.0).abs() < 1e-9);
    }

    #[test]
    fn apr_must_be_positive_and_finite() {
        assert_eq!(Apr::from_percentage(0.0), Err(EngineError::InvalidApr(0.0)));
        assert_eq!(
            Apr::from_percentage(-3.0),
            Err(EngineError::InvalidApr(-3.0))
        );
        assert!(Apr::from_percentage(f64::NAN).is_err());
        assert!(Apr::from_percentage(f64::INFINITY).is_err());
    }

    #[test]
    fn empty_ledger_accrues_nothing() {
        let apr = Apr::from_percentage(35.0).unwrap();
        assert_eq!(accrued_interest(day(0), apr, std::iter::empty(), day(30)), 0.0);
    }

    #[test]
    fn single_draw_accrues_until_horizon() {
        let apr = Apr::from_percentage(36.5).unwrap();
        let ledger = [tx(-50_000, 0, 0)];
        let interest = accrued_interest(day(0), apr, &ledger, day(30));
        assert!((interest - 1_500.0).abs() < 1e-6);
    }

    #[test]
    fn balance_changes_split_the_integral() {
        let apr = Apr::from_percentage(36.5).unwrap();
        let ledger = [tx(-50_000, 0, 0), tx(20_000, 10, 1)];
        let interest = accrued_interest(day(0), apr, &ledger, day(30));
        // 500.00 for 10 days, then 300.00 for 20 days at 0.1% a day.
        assert!((interest - 1_100.0).abs() < 1e-6);
    }

    #[test]
    fn transactions_after_horizon_are_ignored() {
        let apr = Apr::from_percentage(36.5).unwrap();
        let ledger = [tx(-50_000, 0, 0), tx(-40_000, 45, 1)];
        let interest = accrued_interest(day(0), apr, &ledger, day(30));
        assert!((interest - 1_500.0).abs() < 1e-6);
    }

    #[test]
    fn same_day_transactions_only_net_out() {
        let apr = Apr::from_percentage(36.5).unwrap();
        let ledger = [tx(-50_000, 5, 0), tx(20_000, 5, 1), tx(-10_000, 5, 2)];
        let interest = accrued_interest(day(0), apr, &ledger, day(30));
        // 400.00 outstanding from day 5 to day 30.
        assert!((interest - 1_000.0).abs() < 1e-6);
    }

    #[test]
    fn transaction_on_horizon_day_adds_no_stub() {
        let apr = Apr::from_percentage(36.5).unwrap();
        let ledger = [tx(-50_000, 0, 0), tx(-10_000, 30, 1)];
        let interest = accrued_interest(day(0), apr, &ledger, day(30));
        assert!((interest - 1_500.0).abs() < 1e-6);
    }
}
