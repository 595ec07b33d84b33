use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::system_monitor::metrics::Snapshot;
use crate::error::Result;
use crate::ui::formatters::format_ctime;

use super::Sink;

const NOT_AVAILABLE: &str = "N/A";

/// Appends one fixed-format text block per snapshot to a file.
///
/// The file is truncated when the sink is created. Every record is flushed
/// and synced before `consume` returns.
pub struct LogSink {
    path: PathBuf,
    file: File,
    records: u64,
}

impl LogSink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            path,
            file,
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    /// Flush, sync and close the file.
    pub fn finish(mut self) -> Result<u64> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(self.records)
    }
}

impl Sink for LogSink {
    fn name(&self) -> &str {
        "log-file"
    }

    fn consume(&mut self, snapshot: &Snapshot) -> Result<()> {
        let record = format_log_record(snapshot);
        self.file.write_all(record.as_bytes())?;
        self.file.flush()?;
        if let Err(e) = self.file.sync_data() {
            log::debug!("sync_data on {} failed: {}", self.path.display(), e);
        }
        self.records += 1;
        Ok(())
    }
}

/// Render one log block: timestamp, five metric lines, blank separator.
pub fn format_log_record(snapshot: &Snapshot) -> String {
    let percent = |value: Option<f32>| match value {
        Some(p) => format!("{:.1}%", p),
        None => NOT_AVAILABLE.to_string(),
    };
    let counter = |value: Option<u64>| match value {
        Some(n) => n.to_string(),
        None => NOT_AVAILABLE.to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", format_ctime(&snapshot.timestamp));
    let _ = writeln!(out, "CPU Usage: {}", percent(snapshot.cpu.map(|c| c.percent)));
    let _ = writeln!(
        out,
        "Memory Usage: {}",
        percent(snapshot.memory.map(|m| m.percent))
    );
    let _ = writeln!(
        out,
        "Disk Usage: {}",
        percent(snapshot.primary_disk().map(|d| d.percent))
    );
    let _ = writeln!(
        out,
        "Network Sent: {}",
        counter(snapshot.network.map(|n| n.bytes_sent))
    );
    let _ = writeln!(
        out,
        "Network Received: {}",
        counter(snapshot.network.map(|n| n.bytes_received))
    );
    out.push('\n');
    out
}
