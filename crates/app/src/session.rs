//! Interactive terminal session.
//!
//! The loop never ends on its own: after a line of credit is closed with
//! `done`, a new one is opened. Blank input at the limit prompt (or end of
//! input) quits.
use std::io::{BufRead, Write};

use engine::{Clock, DAYS_PER_PERIOD, LineOfCredit, MoneyCents, TransactionDate};

use crate::{
    error::{AppError, Result},
    parsing::{Command, parse_command, parse_number},
    settings::Settings,
};

const LIMIT_PROMPT: &str = "Please enter the principal for a new line of credit (Empty to quit).";
const APR_PROMPT: &str = "Please enter an APR, in % (e.g. for 35%, enter '35', not '0.35')";
const TRANSACTION_PROMPT: &str = "Please enter, separated by spaces:
* A transaction type (\"withdraw\" or \"pay\")
* A transaction amount
* The number of days since the line of credit was opened (0 for same day)
Or, enter \"ledger\" or \"statement\" to review, or \"done\" to stop entering data.";

pub struct Session<R, W, C> {
    input: R,
    output: W,
    clock: C,
    settings: Settings,
}

/// What the transaction loop should do after a line.
enum Flow {
    Continue,
    Done,
}

impl<R: BufRead, W: Write, C: Clock> Session<R, W, C> {
    pub fn new(input: R, output: W, clock: C, settings: Settings) -> Self {
        Self {
            input,
            output,
            clock,
            settings,
        }
    }

    /// Runs until the user quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(limit) = self.prompt_limit()? else {
                tracing::info!("no limit entered, quitting");
                return Ok(());
            };
            let Some(apr) = self.prompt_apr()? else {
                return Ok(());
            };

            let mut builder = LineOfCredit::builder(limit).apr(apr);
            if let Some(opened_at) = self.settings.opened_at {
                builder = builder.opened_at(opened_at);
            }
            let mut line = match builder.build(&self.clock) {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!("cannot open line of credit: {err}");
                    writeln!(self.output, "Error: {err}")?;
                    continue;
                }
            };
            tracing::info!(
                limit = %line.limit(),
                apr = line.apr().percentage(),
                opened_at = %line.opened_at(),
                "opened line of credit"
            );

            self.enter_transactions(&mut line)?;

            writeln!(self.output, "*** AMOUNT OWED ***")?;
            match line.amount_owed(self.settings.period_months) {
                Ok(owed) => writeln!(self.output, "{owed}")?,
                Err(err) => {
                    tracing::warn!("cannot compute amount owed: {err}");
                    writeln!(self.output, "Unavailable: {err}")?;
                }
            }
        }
    }

    /// Reads one line, `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn prompt_limit(&mut self) -> Result<Option<MoneyCents>> {
        loop {
            writeln!(self.output, "{LIMIT_PROMPT}")?;
            let Some(raw) = self.read_line()? else {
                return Ok(None);
            };
            if raw.is_empty() {
                return Ok(None);
            }
            if let Some(limit) = parse_number(&raw) {
                return Ok(Some(limit));
            }
        }
    }

    fn prompt_apr(&mut self) -> Result<Option<f64>> {
        loop {
            writeln!(self.output, "{APR_PROMPT}")?;
            let Some(raw) = self.read_line()? else {
                return Ok(None);
            };
            if raw.is_empty() {
                return Ok(Some(self.settings.default_apr));
            }
            if let Some(apr) = parse_number(&raw) {
                return Ok(Some(apr));
            }
        }
    }

    fn enter_transactions(&mut self, line: &mut LineOfCredit) -> Result<()> {
        loop {
            writeln!(self.output, "{TRANSACTION_PROMPT}")?;
            let Some(raw) = self.read_line()? else {
                return Ok(());
            };
            match self.handle(line, &raw) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Done) => return Ok(()),
                Err(err @ (AppError::Engine(_) | AppError::Parse(_))) => {
                    tracing::warn!(input = %raw, "rejected: {err}");
                    writeln!(self.output, "Error: {err}")?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn handle(&mut self, line: &mut LineOfCredit, raw: &str) -> Result<Flow> {
        match parse_command(raw)? {
            Command::Withdraw { amount, days } => {
                let date = self.resolve(days);
                let transaction = line.withdraw(amount, date)?;
                tracing::debug!(
                    amount = %transaction.amount(),
                    date = %transaction.date(),
                    "withdrawal recorded"
                );
                self.report(line)?;
            }
            Command::Pay { amount, days } => {
                let date = self.resolve(days);
                let transaction = line.pay(amount, date)?;
                tracing::debug!(
                    amount = %transaction.amount(),
                    date = %transaction.date(),
                    "payment recorded"
                );
                self.report(line)?;
            }
            Command::Ledger => {
                if line.ledger().is_empty() {
                    writeln!(self.output, "No transactions yet.")?;
                }
                for transaction in line.ledger() {
                    let kind = if transaction.is_payment() { "pay" } else { "withdraw" };
                    let days = (transaction.date() - line.opened_at()).num_days();
                    writeln!(
                        self.output,
                        "{} (day {days}) {kind} {}",
                        transaction.date(),
                        transaction.amount().abs(),
                    )?;
                }
            }
            Command::Statement => {
                let statement = line.statement(self.settings.period_months)?;
                writeln!(self.output, "{}", serde_json::to_string_pretty(&statement)?)?;
            }
            Command::Done => return Ok(Flow::Done),
        }
        Ok(Flow::Continue)
    }

    fn resolve(&self, days: Option<i64>) -> TransactionDate {
        match days {
            Some(days) => TransactionDate::OffsetDays(days),
            None => TransactionDate::today(&self.clock),
        }
    }

    /// Prints the line after an accepted transaction. A failed projection
    /// does not undo the transaction, so it is not reported as a rejection.
    fn report(&mut self, line: &LineOfCredit) -> Result<()> {
        let period = self.settings.period_months;
        let horizon_day = period.saturating_mul(DAYS_PER_PERIOD);
        writeln!(
            self.output,
            "Your current line of credit is {} / {}",
            line.principal(),
            line.limit()
        )?;
        match line.amount_owed(period) {
            Ok(owed) => writeln!(self.output, "As of day {horizon_day}, you will owe {owed}")?,
            Err(err) => {
                tracing::warn!("transaction recorded, projection failed: {err}");
                writeln!(
                    self.output,
                    "Transaction recorded, but the amount owed as of day {horizon_day} is unavailable: {err}"
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::NaiveDate;
    use engine::FixedClock;

    use super::*;

    fn opened() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn run(input: &str) -> String {
        run_with(input, Settings::default())
    }

    fn run_with(input: &str, settings: Settings) -> String {
        let mut output = Vec::new();
        let mut session = Session::new(
            Cursor::new(input.to_string()),
            &mut output,
            FixedClock(opened()),
            settings,
        );
        session.run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn blank_limit_quits_immediately() {
        let out = run("\n");
        assert_eq!(out, format!("{LIMIT_PROMPT}\n"));
    }

    #[test]
    fn end_of_input_quits() {
        let out = run("");
        assert_eq!(out, format!("{LIMIT_PROMPT}\n"));
    }

    #[test]
    fn draw_and_repay_reports_principal_and_projection() {
        let out = run("1000\n36.5\nwithdraw 500 0\npay 200 10\ndone\n\n");
        assert!(out.contains("Your current line of credit is 500.00 / 1000.00"));
        assert!(out.contains("As of day 30, you will owe 515.00"));
        assert!(out.contains("Your current line of credit is 700.00 / 1000.00"));
        assert!(out.contains("As of day 30, you will owe 311.00"));
        assert!(out.contains("*** AMOUNT OWED ***\n311.00\n"));
    }

    #[test]
    fn malformed_numbers_are_reprompted_silently() {
        let out = run("lots\n1000\nsome\n36.5\ndone\n\n");
        assert_eq!(out.matches(LIMIT_PROMPT).count(), 3);
        assert_eq!(out.matches(APR_PROMPT).count(), 2);
        assert!(!out.contains("Error"));
        assert!(out.contains("*** AMOUNT OWED ***\n0.00\n"));
    }

    #[test]
    fn non_positive_limit_restarts_with_an_error() {
        let out = run("0\n35\n\n");
        assert!(out.contains("Error: Limit must be a positive amount, got 0.00"));
        assert_eq!(out.matches(LIMIT_PROMPT).count(), 2);
    }

    #[test]
    fn blank_apr_uses_default() {
        let settings = Settings {
            default_apr: 36.5,
            ..Settings::default()
        };
        let out = run_with("1000\n\nwithdraw 500 0\ndone\n\n", settings);
        assert!(out.contains("*** AMOUNT OWED ***\n515.00\n"));
    }

    #[test]
    fn rejected_transactions_are_reported_and_loop_continues() {
        let out = run("1000\n35\nwithdraw 2000 0\nborrow 5\npay 10 0\nwithdraw 10 -1\ndone\n\n");
        assert!(out.contains("Error: Cannot withdraw 2000.00: only 1000.00 is left on the line"));
        assert!(out.contains("Error: unknown command \"borrow\""));
        assert!(out.contains("Error: Cannot pay 10.00: only 0.00 is owed"));
        assert!(out.contains("Error: Cannot add a transaction on 2023-12-31"));
        assert!(out.contains("*** AMOUNT OWED ***\n0.00\n"));
    }

    #[test]
    fn missing_days_means_today() {
        let settings = Settings {
            opened_at: NaiveDate::from_ymd_opt(2023, 12, 22),
            ..Settings::default()
        };
        // Opened ten days before the clock's today.
        let out = run_with("1000\n36.5\nwithdraw 500\nledger\ndone\n\n", settings);
        assert!(out.contains("2024-01-01 (day 10) withdraw 500.00"));
        // 500.00 from day 10 to day 30 at 0.1% a day.
        assert!(out.contains("*** AMOUNT OWED ***\n510.00\n"));
    }

    #[test]
    fn ledger_and_statement_show_the_recorded_transactions() {
        let out = run("1000\n36.5\nledger\nwithdraw 500 0\npay 200 10\nledger\nstatement\ndone\n\n");
        assert!(out.contains("No transactions yet."));
        assert!(out.contains("2024-01-01 (day 0) withdraw 500.00"));
        assert!(out.contains("2024-01-11 (day 10) pay 200.00"));
        assert!(out.contains("\"amount_owed\": 31100"));
        assert!(out.contains("\"horizon\": \"2024-01-31\""));
    }

    #[test]
    fn a_new_line_is_opened_after_done() {
        let out = run("1000\n36.5\nwithdraw 500 0\ndone\n200\n35\ndone\n\n");
        assert!(out.contains("*** AMOUNT OWED ***\n515.00\n"));
        assert!(out.contains("*** AMOUNT OWED ***\n0.00\n"));
        assert_eq!(out.matches(LIMIT_PROMPT).count(), 3);
    }

    #[test]
    fn failed_projection_keeps_the_transaction_and_the_session() {
        let out = run("1000\n1e20\nwithdraw 500 0\nledger\ndone\n\n");
        assert!(out.contains("Your current line of credit is 500.00 / 1000.00"));
        assert!(out.contains("Transaction recorded, but the amount owed as of day 30 is unavailable"));
        assert!(!out.contains("Error:"));
        assert!(out.contains("2024-01-01 (day 0) withdraw 500.00"));
        assert!(out.contains("*** AMOUNT OWED ***\nUnavailable: "));
        assert_eq!(out.matches(LIMIT_PROMPT).count(), 2);
    }

    #[test]
    fn projection_follows_configured_period() {
        let settings = Settings {
            period_months: 2,
            ..Settings::default()
        };
        let out = run_with("1000\n36.5\nwithdraw 500 0\ndone\n\n", settings);
        assert!(out.contains("As of day 60, you will owe 530.00"));
    }
}
