//! Host metrics sampling core.
//!
//! A [`Scheduler`] ticks a [`SamplingEngine`], which runs one collector per
//! metric category against a [`HostProbe`] and hands the resulting
//! [`Snapshot`] to its [`Sink`]s. A [`LogSession`] samples on its own
//! cadence into a file for a bounded time.
//!
//! ```text
//! Scheduler ──tick──▶ SamplingEngine ──▶ collectors ──▶ HostProbe
//!                            │
//!                            └──Snapshot──▶ LiveSink / JsonSink / LogSink
//! ```

mod collector;
mod engine;
mod log_session;
mod metrics;
pub mod mock;
mod probe;
mod runtime;
mod scheduler;
pub mod sinks;

pub use collector::{
    Collector, CollectorConfig, CpuCollector, DiskCollector, MemoryCollector, NetworkCollector,
    ProcessCollector, SystemIdentityCollector, TemperatureCollector, DEFAULT_CPU_WINDOW,
    DEFAULT_SENSOR_GROUP,
};
pub use engine::SamplingEngine;
pub use log_session::{
    LogController, LogHandle, LogSession, LogSessionConfig, LogSummary, DEFAULT_LOG_DURATION,
    DEFAULT_LOG_FILE, DEFAULT_LOG_INTERVAL,
};
pub use metrics::{
    clamp_percent, percent_of, CategoryFailure, CpuMetric, DiskMetric, MemoryMetric,
    MetricCategory, NetworkMetric, ProcessMetric, Snapshot, SystemIdentity, Temperature,
    TemperatureMetric,
};
pub use probe::{HostProbe, Partition, SensorReading, SpaceUsage, SysinfoProbe};
pub use runtime::MonitorRuntime;
pub use scheduler::{
    Control, PauseState, Scheduler, SchedulerHandle, SchedulerState, SchedulerStats,
    DEFAULT_TICK_INTERVAL,
};
pub use sinks::{JsonSink, LiveSink, LiveView, LogSink, Sink};
