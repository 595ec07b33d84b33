use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::system_monitor::{LogController, MonitorRuntime, SamplingEngine};

use super::event_handler::MonitorEvent;
use super::render::{render_ui, ViewStatus};

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Configuration for the monitor app
pub struct MonitorAppConfig {
    pub interval: Duration,
    pub engine: SamplingEngine,
    pub logging: Option<LogController>,
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: MonitorAppConfig) -> Result<()> {
    let logging = config.logging.clone();
    let runtime = MonitorRuntime::start(config.engine, config.interval, config.logging)
        .context("Failed to start metrics runtime")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = event_loop(&mut terminal, &runtime, logging.as_ref());

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    let stats = runtime.shutdown();
    log::debug!("Monitor finished: {:?}", stats);

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &MonitorRuntime,
    logging: Option<&LogController>,
) -> Result<()> {
    loop {
        let snapshot = runtime.snapshot_rx.borrow().clone();
        let status = ViewStatus {
            paused: runtime.handle.is_paused(),
            logging: logging.is_some_and(|l| l.is_active()),
        };
        terminal.draw(|frame| render_ui(frame, snapshot.as_deref(), &status))?;

        if !event::poll(INPUT_POLL).context("Event poll failed")? {
            continue;
        }
        let Event::Key(key) = event::read().context("Event read failed")? else {
            continue;
        };

        let monitor_event = MonitorEvent::from_key(key);
        if monitor_event == MonitorEvent::Quit {
            return Ok(());
        }
        if let Some(control) = monitor_event.control() {
            if !runtime.handle.send(control) {
                return Ok(());
            }
        }
    }
}
