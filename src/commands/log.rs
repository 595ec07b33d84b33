use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::system_monitor::LogSession;

/// Run one bounded logging session in the foreground
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::effective_config(matches)?;
    let session_config = config.log_session_config();

    println!(
        "Logging {} records to {} ...",
        session_config.expected_records(),
        session_config.path.display().to_string().cyan()
    );

    let summary = LogSession::with_sysinfo(session_config)
        .run()
        .context("Logging session failed")?;

    println!(
        "{} Data saved to {}",
        "Logging complete.".green(),
        summary.path.display()
    );
    Ok(())
}
