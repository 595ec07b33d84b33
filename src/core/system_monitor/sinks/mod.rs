//! Consumers of sampled snapshots.

mod json;
mod live;
mod log_file;

pub use json::JsonSink;
pub use live::{live_channel, LiveSink, LiveView};
pub use log_file::{format_log_record, LogSink};

use crate::error::Result;

use super::metrics::Snapshot;

/// Receives every snapshot produced by a pass.
///
/// `consume` is called synchronously from the sampling path, so it should
/// return quickly and must not panic. An `Err` deactivates the sink; the
/// other sinks keep receiving snapshots.
pub trait Sink: Send {
    fn name(&self) -> &str;

    fn consume(&mut self, snapshot: &Snapshot) -> Result<()>;
}
