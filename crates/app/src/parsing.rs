use engine::{EngineError, MoneyCents};

/// One line typed at the transaction prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Withdraw {
        amount: MoneyCents,
        days: Option<i64>,
    },
    Pay {
        amount: MoneyCents,
        days: Option<i64>,
    },
    Ledger,
    Statement,
    Done,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("unknown command \"{0}\": expected withdraw, pay, ledger, statement or done")]
    UnknownCommand(String),
    #[error("missing amount")]
    MissingAmount,
    #[error(transparent)]
    InvalidAmount(#[from] EngineError),
    #[error("\"{0}\" is not a whole number of days")]
    InvalidDays(String),
    #[error("too many arguments: expected <withdraw|pay> <amount> [<days>]")]
    TooManyArguments,
}

/// Parses a transaction prompt line.
///
/// Rules:
/// - `withdraw <amount> [<days>]` and `pay <amount> [<days>]`
/// - `<days>` counts from the opening date; omitted means today
/// - `ledger`, `statement` and `done` take no argument
/// - keywords are case-insensitive
pub(crate) fn parse_command(input: &str) -> Result<Command, ParseError> {
    let lowered = input.trim().to_lowercase();
    let mut tokens = lowered.split_whitespace();
    let keyword = tokens.next().ok_or(ParseError::Empty)?;

    let command = match keyword {
        "withdraw" | "pay" => {
            let amount: MoneyCents = tokens.next().ok_or(ParseError::MissingAmount)?.parse()?;
            let days = tokens
                .next()
                .map(|raw| {
                    raw.parse::<i64>()
                        .map_err(|_| ParseError::InvalidDays(raw.to_string()))
                })
                .transpose()?;
            if keyword == "withdraw" {
                Command::Withdraw { amount, days }
            } else {
                Command::Pay { amount, days }
            }
        }
        "ledger" => Command::Ledger,
        "statement" => Command::Statement,
        "done" => Command::Done,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    if tokens.next().is_some() {
        return Err(ParseError::TooManyArguments);
    }
    Ok(command)
}

/// Parses a number typed at the limit or APR prompt. Anything that is not a
/// plain number gives `None`.
pub(crate) fn parse_number<T: std::str::FromStr>(input: &str) -> Option<T> {
    input.trim().parse().ok()
}
