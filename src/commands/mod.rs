// Command handlers module
pub mod config;
pub mod log;
pub mod monitor;
pub mod snapshot;
pub mod version;

// Re-exports for cleaner imports
pub use version::execute as version;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::Config;

/// Load the stored config and apply the overrides present on the command line.
pub(crate) fn effective_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;

    if let Some(interval) = arg::<u64>(matches, "interval") {
        config.refresh_interval_ms = interval;
    }
    if let Some(file) = arg::<String>(matches, "file") {
        config.log_file = file;
    }
    if let Some(duration) = arg::<u64>(matches, "duration") {
        config.log_duration_secs = duration;
    }
    if let Some(interval) = arg::<u64>(matches, "log-interval") {
        config.log_interval_ms = interval;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn arg<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}
