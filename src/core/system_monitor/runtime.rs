//! Tokio runtime hosting the scheduler for the `monitor` command.

use tokio::task::JoinHandle;

use super::engine::SamplingEngine;
use super::log_session::LogController;
use super::scheduler::{Scheduler, SchedulerHandle, SchedulerStats};
use super::sinks::{live_channel, LiveView};

/// Wrapper around the Tokio runtime that drives sampling in the background.
pub struct MonitorRuntime {
    /// Latest snapshot for the display
    pub snapshot_rx: LiveView,

    /// Control surface (pause, refresh, logging, shutdown)
    pub handle: SchedulerHandle,

    scheduler_task: JoinHandle<SchedulerStats>,

    runtime: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    /// Register a live sink on `engine` and start scheduling it.
    pub fn start(
        mut engine: SamplingEngine,
        interval: std::time::Duration,
        logging: Option<LogController>,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("metrics-worker")
            .build()?;

        let (live_sink, snapshot_rx) = live_channel();
        engine.add_sink(Box::new(live_sink));

        let mut scheduler = Scheduler::new(engine, interval);
        if let Some(controller) = logging {
            scheduler = scheduler.with_logging(controller);
        }
        let (handle, control_rx) = scheduler.channel();
        let scheduler_task = runtime.spawn(scheduler.run(control_rx));

        log::debug!("MonitorRuntime started with {:?} interval", interval);

        Ok(Self {
            snapshot_rx,
            handle,
            scheduler_task,
            runtime,
        })
    }

    /// Stop the scheduler and wait for the in-flight pass to finish.
    pub fn shutdown(self) -> SchedulerStats {
        self.handle.shutdown();
        match self.runtime.block_on(self.scheduler_task) {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("Scheduler task failed: {}", e);
                SchedulerStats::default()
            }
        }
    }
}
