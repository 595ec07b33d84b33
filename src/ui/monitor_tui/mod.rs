//! Terminal view over the live snapshot channel.
//!
//! This is a thin consumer: it draws whatever the scheduler last published
//! and turns key presses into control signals.

mod app;
mod event_handler;
mod render;

pub use app::{run_monitor_app, MonitorAppConfig};
pub use event_handler::MonitorEvent;
