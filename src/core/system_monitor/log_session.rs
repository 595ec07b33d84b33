//! Bounded-duration logging to a text file.
//!
//! A [`LogSession`] samples on its own cadence, independent of the live
//! scheduler, writes one record per interval and stops by itself once its
//! duration has elapsed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, SysmonError};

use super::collector::CollectorConfig;
use super::engine::SamplingEngine;
use super::probe::{HostProbe, SysinfoProbe};
use super::sinks::{LogSink, Sink};

pub const DEFAULT_LOG_FILE: &str = "system_log.txt";
pub const DEFAULT_LOG_DURATION: Duration = Duration::from_secs(30);
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSessionConfig {
    pub path: PathBuf,
    pub duration: Duration,
    pub interval: Duration,
}

impl Default for LogSessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_FILE),
            duration: DEFAULT_LOG_DURATION,
            interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

impl LogSessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(SysmonError::config("log interval must be greater than zero"));
        }
        Ok(())
    }

    /// Number of records a session writes: `ceil(duration / interval)`.
    pub fn expected_records(&self) -> u64 {
        let interval = self.interval.as_nanos();
        if interval == 0 {
            return 0;
        }
        self.duration.as_nanos().div_ceil(interval) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSummary {
    pub path: PathBuf,
    pub records: u64,
    pub elapsed: Duration,
}

pub struct LogSession {
    config: LogSessionConfig,
    engine: SamplingEngine,
}

impl LogSession {
    pub fn new(config: LogSessionConfig, mut probe: Box<dyn HostProbe>) -> Self {
        probe.prime();
        Self {
            config,
            engine: SamplingEngine::new(probe, CollectorConfig::log_record()),
        }
    }

    pub fn with_sysinfo(config: LogSessionConfig) -> Self {
        Self::new(config, Box::new(SysinfoProbe::new()))
    }

    pub fn config(&self) -> &LogSessionConfig {
        &self.config
    }

    /// Write records until `duration` has elapsed, close the file and report.
    ///
    /// Record `k` is due at `start + k * interval`, at most
    /// `ceil(duration / interval)` of them. A record that would start at or
    /// after `start + duration` is not taken, so slow passes end the session
    /// with fewer records. A write error ends the session early.
    pub fn run(mut self) -> Result<LogSummary> {
        self.config.validate()?;
        let mut sink = LogSink::create(&self.config.path)?;
        let count = self.config.expected_records();
        let start = Instant::now();
        let deadline = start.checked_add(self.config.duration);

        log::info!(
            "Logging up to {} records to {} every {:?}",
            count,
            self.config.path.display(),
            self.config.interval
        );

        for k in 0..count {
            let Some(due) = start.checked_add(record_offset(self.config.interval, k)) else {
                break;
            };
            if deadline.is_some_and(|end| due >= end) {
                break;
            }
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
            if deadline.is_some_and(|end| Instant::now() >= end) {
                log::warn!(
                    "Logging to {} fell behind; stopping after {} of {} records",
                    self.config.path.display(),
                    sink.records(),
                    count
                );
                break;
            }

            let snapshot = self.engine.run_pass();
            if let Err(e) = sink.consume(&snapshot) {
                log::error!(
                    "Logging to {} stopped after {} records: {}",
                    self.config.path.display(),
                    sink.records(),
                    e
                );
                return Err(e);
            }
        }

        let records = sink.finish()?;
        let elapsed = start.elapsed();
        log::info!(
            "Logging complete: {} records in {:?} saved to {}",
            records,
            elapsed,
            self.config.path.display()
        );

        Ok(LogSummary {
            path: self.config.path,
            records,
            elapsed,
        })
    }
}

/// Offset of record `k` from the session start.
fn record_offset(interval: Duration, k: u64) -> Duration {
    let nanos = interval.as_nanos().saturating_mul(u128::from(k));
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .unwrap_or(Duration::MAX)
}

type ProbeFactory = dyn Fn() -> Box<dyn HostProbe> + Send + Sync;

/// Starts logging sessions on a background thread, one at a time.
#[derive(Clone)]
pub struct LogController {
    config: LogSessionConfig,
    probe_factory: Arc<ProbeFactory>,
    active: Arc<AtomicBool>,
}

/// A running session. Joining yields the session result.
pub struct LogHandle {
    thread: JoinHandle<Result<LogSummary>>,
}

impl LogHandle {
    pub fn join(self) -> Result<LogSummary> {
        self.thread
            .join()
            .map_err(|_| SysmonError::system_monitor("logging thread panicked"))?
    }
}

struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl LogController {
    pub fn new<F>(config: LogSessionConfig, probe_factory: F) -> Self
    where
        F: Fn() -> Box<dyn HostProbe> + Send + Sync + 'static,
    {
        Self {
            config,
            probe_factory: Arc::new(probe_factory),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_sysinfo(config: LogSessionConfig) -> Self {
        Self::new(config, || Box::new(SysinfoProbe::new()))
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Spawn a session. Rejected while another session is still running.
    pub fn start(&self) -> Result<LogHandle> {
        self.config.validate()?;
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SysmonError::logging_active(
                self.config.path.display().to_string(),
            ));
        }

        let guard = ActiveGuard(self.active.clone());
        let config = self.config.clone();
        let factory = self.probe_factory.clone();

        let spawned = thread::Builder::new()
            .name("log-session".to_string())
            .spawn(move || {
                let _guard = guard;
                let result = LogSession::new(config, factory()).run();
                if let Err(e) = &result {
                    log::error!("Logging session failed: {}", e);
                }
                result
            });

        match spawned {
            Ok(thread) => Ok(LogHandle { thread }),
            Err(e) => {
                self.active.store(false, Ordering::SeqCst);
                Err(e.into())
            }
        }
    }
}
