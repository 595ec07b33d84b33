//! Periodic driver for the sampling engine.
//!
//! The scheduler owns the pause flag and the tick cadence. Control arrives
//! as [`Control`] messages through a [`SchedulerHandle`], so nothing but the
//! atomic pause flag is shared with the control surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use super::engine::SamplingEngine;
use super::log_session::LogController;
use super::metrics::Snapshot;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Process-wide pause flag. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct PauseState(Arc<AtomicBool>);

impl PauseState {
    pub fn is_paused(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::SeqCst)
    }

    /// Set the flag; returns whether it changed.
    pub fn set_paused(&self, paused: bool) -> bool {
        self.0.swap(paused, Ordering::SeqCst) != paused
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Paused,
}

/// Signals from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Pause,
    Resume,
    /// Run one pass now, outside the timer.
    Refresh,
    /// Start a bounded logging session.
    StartLogging,
    Shutdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub passes: u64,
    pub paused_ticks: u64,
    pub refreshes: u64,
}

/// Cloneable sender side of the control channel.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::UnboundedSender<Control>,
    pause: PauseState,
}

impl SchedulerHandle {
    /// Returns false once the scheduler has stopped.
    pub fn send(&self, control: Control) -> bool {
        self.tx.send(control).is_ok()
    }

    pub fn toggle_pause(&self) -> bool {
        self.send(Control::TogglePause)
    }

    pub fn refresh(&self) -> bool {
        self.send(Control::Refresh)
    }

    pub fn start_logging(&self) -> bool {
        self.send(Control::StartLogging)
    }

    pub fn shutdown(&self) -> bool {
        self.send(Control::Shutdown)
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }
}

pub struct Scheduler {
    engine: Arc<Mutex<SamplingEngine>>,
    pause: PauseState,
    interval: Duration,
    logging: Option<LogController>,
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new(mut engine: SamplingEngine, interval: Duration) -> Self {
        let pause = PauseState::default();
        engine.attach_pause(pause.clone());
        Self {
            engine: Arc::new(Mutex::new(engine)),
            pause,
            interval,
            logging: None,
            stats: SchedulerStats::default(),
        }
    }

    /// Handle `Control::StartLogging` with this controller.
    pub fn with_logging(mut self, controller: LogController) -> Self {
        self.logging = Some(controller);
        self
    }

    /// Create the control channel for [`Scheduler::run`].
    pub fn channel(&self) -> (SchedulerHandle, mpsc::UnboundedReceiver<Control>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            SchedulerHandle {
                tx,
                pause: self.pause.clone(),
            },
            rx,
        )
    }

    pub fn pause_state(&self) -> PauseState {
        self.pause.clone()
    }

    pub fn state(&self) -> SchedulerState {
        if self.pause.is_paused() {
            SchedulerState::Paused
        } else {
            SchedulerState::Running
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// One timed tick: sample unless paused.
    pub fn tick(&mut self) -> Option<Snapshot> {
        self.stats.ticks += 1;
        if self.pause.is_paused() {
            self.stats.paused_ticks += 1;
            return None;
        }
        self.stats.passes += 1;
        Some(self.engine.lock().sample())
    }

    /// Out-of-band pass; runs whether or not the scheduler is paused.
    pub fn refresh(&mut self) -> Snapshot {
        self.stats.refreshes += 1;
        self.stats.passes += 1;
        self.engine.lock().sample()
    }

    /// Apply a control signal that does not need the async loop.
    /// Returns false for `Shutdown`.
    pub fn handle_control(&mut self, control: Control) -> bool {
        match control {
            Control::TogglePause => {
                let paused = self.pause.toggle();
                log::info!("Sampling {}", if paused { "paused" } else { "resumed" });
            }
            Control::Pause => {
                self.pause.set_paused(true);
            }
            Control::Resume => {
                self.pause.set_paused(false);
            }
            Control::Refresh => {
                self.refresh();
            }
            Control::StartLogging => self.start_logging(),
            Control::Shutdown => return false,
        }
        true
    }

    fn start_logging(&self) {
        match &self.logging {
            Some(controller) => {
                if let Err(e) = controller.start() {
                    log::warn!("Not starting logging: {}", e);
                }
            }
            None => log::warn!("Logging requested but no log controller is configured"),
        }
    }

    /// Drive the engine until `Shutdown` arrives or every handle is dropped.
    ///
    /// Passes run on the blocking pool and are awaited before the next
    /// message or tick is looked at, so passes never overlap. A refresh does
    /// not move the timer.
    pub async fn run(mut self, mut control_rx: mpsc::UnboundedReceiver<Control>) -> SchedulerStats {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.stats.ticks += 1;
                    if self.pause.is_paused() {
                        self.stats.paused_ticks += 1;
                        continue;
                    }
                    self.stats.passes += 1;
                    self.sample_blocking().await;
                }
                control = control_rx.recv() => {
                    match control {
                        Some(Control::Refresh) => {
                            self.stats.refreshes += 1;
                            self.stats.passes += 1;
                            self.sample_blocking().await;
                        }
                        Some(Control::Shutdown) | None => break,
                        Some(other) => {
                            self.handle_control(other);
                        }
                    }
                }
            }
        }

        log::debug!("Scheduler stopped: {:?}", self.stats);
        self.stats
    }

    async fn sample_blocking(&self) {
        let engine = self.engine.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || {
            engine.lock().sample();
        })
        .await
        {
            log::error!("Sampling pass aborted: {}", e);
        }
    }
}
