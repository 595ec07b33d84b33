use std::sync::Arc;

use tokio::sync::watch;

use crate::core::system_monitor::metrics::Snapshot;
use crate::error::{Result, SysmonError};

use super::Sink;

/// Receiving half of a live channel. Always holds the latest snapshot, if any.
pub type LiveView = watch::Receiver<Option<Arc<Snapshot>>>;

/// Publishes each snapshot to a display surface through a watch channel.
pub struct LiveSink {
    tx: watch::Sender<Option<Arc<Snapshot>>>,
}

/// Create a live sink together with the view a display reads from.
pub fn live_channel() -> (LiveSink, LiveView) {
    let (tx, rx) = watch::channel(None);
    (LiveSink { tx }, rx)
}

impl Sink for LiveSink {
    fn name(&self) -> &str {
        "live"
    }

    fn consume(&mut self, snapshot: &Snapshot) -> Result<()> {
        // watch::send() only fails once every receiver is gone
        self.tx
            .send(Some(Arc::new(snapshot.clone())))
            .map_err(|_| SysmonError::system_monitor("live view closed"))
    }
}
