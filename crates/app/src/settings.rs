//! Handles settings for the application.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file
//! (`config/line_of_credit.toml` unless `--config` says otherwise),
//! `LINE_OF_CREDIT_*` environment variables, command line flags.
use chrono::NaiveDate;
use clap::Parser;
use engine::DEFAULT_APR_PERCENT;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/line_of_credit.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level for the `line_of_credit` and `engine` log targets.
    pub log_level: String,
    /// APR, in percent, used when the APR prompt is left blank.
    pub default_apr: f64,
    /// Number of 30-day periods used for every projection.
    pub period_months: i64,
    /// Opening date of every line; today when unset.
    pub opened_at: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_apr: DEFAULT_APR_PERCENT,
            period_months: 1,
            opened_at: None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "line_of_credit")]
#[command(about = "Open a revolving line of credit and project what you will owe")]
pub(crate) struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override the APR, in percent, used for a blank APR prompt.
    #[arg(long)]
    default_apr: Option<f64>,
    /// Override the number of 30-day periods to project.
    #[arg(long)]
    period_months: Option<i64>,
    /// Open every line on this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    opened_at: Option<NaiveDate>,
}

pub fn load() -> Result<Settings> {
    from_args(Args::parse())
}

pub(crate) fn from_args(args: Args) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let builder = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(args.config.is_some()))
        .add_source(config::Environment::with_prefix("LINE_OF_CREDIT"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(default_apr) = args.default_apr {
        settings.default_apr = default_apr;
    }
    if let Some(period_months) = args.period_months {
        settings.period_months = period_months;
    }
    if let Some(opened_at) = args.opened_at {
        settings.opened_at = Some(opened_at);
    }

    if settings.period_months <= 0 {
        return Err(AppError::Setting(format!(
            "period_months must be positive, got {}",
            settings.period_months
        )));
    }
    Ok(settings)
}
