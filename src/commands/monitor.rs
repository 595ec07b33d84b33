//! Live monitor command handler.
//!
//! Runs the scheduler in the background and shows snapshots either in a
//! terminal view or as JSON lines on stdout.

use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::system_monitor::{JsonSink, LogController, MonitorRuntime, SamplingEngine};
use crate::ui::monitor_tui::{run_monitor_app, MonitorAppConfig};

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::effective_config(matches)?;
    let json_output = matches.get_flag("json");
    let start_logging = matches.get_flag("log");

    let logging = LogController::with_sysinfo(config.log_session_config());
    let mut engine = SamplingEngine::with_sysinfo(config.collector_config());

    if json_output {
        engine.add_sink(Box::new(JsonSink::new(std::io::stdout())));
        return run_json_output(engine, config.refresh_interval(), logging, start_logging);
    }

    if start_logging {
        logging.start().context("Failed to start logging")?;
    }

    run_monitor_app(MonitorAppConfig {
        interval: config.refresh_interval(),
        engine,
        logging: Some(logging),
    })
    .context("Failed to run system monitor")
}

/// Run in JSON output mode (for scripting) until Ctrl-C
fn run_json_output(
    engine: SamplingEngine,
    interval: std::time::Duration,
    logging: LogController,
    start_logging: bool,
) -> Result<()> {
    let runtime = MonitorRuntime::start(engine, interval, Some(logging))?;
    if start_logging {
        runtime.handle.start_logging();
    }

    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Failed to install Ctrl-C handler")?;

    let _ = stop_rx.recv();
    let stats = runtime.shutdown();
    log::info!(
        "Stopped after {} passes ({} paused ticks)",
        stats.passes,
        stats.paused_ticks
    );
    Ok(())
}
