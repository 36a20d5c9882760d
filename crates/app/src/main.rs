use engine::SystemClock;

use crate::error::Result;

mod error;
mod parsing;
mod session;
mod settings;

fn main() -> Result<()> {
    let settings = settings::load()?;

    // Prompts go to stdout, logs to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "line_of_credit={level},engine={level}",
            level = settings.log_level
        ))
        .init();
    tracing::debug!(?settings, "settings loaded");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = session::Session::new(stdin.lock(), stdout.lock(), SystemClock, settings);
    session.run()
}
