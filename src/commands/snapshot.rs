use anyhow::Result;
use clap::ArgMatches;

use crate::core::system_monitor::SamplingEngine;
use crate::ui::print_snapshot;

/// Take one sample and print it
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::effective_config(matches)?;
    let mut engine = SamplingEngine::with_sysinfo(config.collector_config());
    let snapshot = engine.run_pass();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    for failure in &snapshot.failures {
        log::info!("{} not collected: {}", failure.category, failure.message);
    }

    Ok(())
}
