//! One sampling pass: run every collector, assemble a [`Snapshot`], hand it
//! to the registered sinks.

use chrono::Local;

use crate::error::{CollectError, FailureKind};

use super::collector::*;
use super::metrics::{CategoryFailure, MetricCategory, Snapshot};
use super::probe::{HostProbe, SysinfoProbe};
use super::scheduler::PauseState;
use super::sinks::Sink;

struct SinkSlot {
    sink: Box<dyn Sink>,
    active: bool,
}

pub struct SamplingEngine {
    probe: Box<dyn HostProbe>,
    config: CollectorConfig,
    cpu: CpuCollector,
    memory: MemoryCollector,
    disks: DiskCollector,
    network: NetworkCollector,
    temperature: TemperatureCollector,
    processes: ProcessCollector,
    identity: SystemIdentityCollector,
    sinks: Vec<SinkSlot>,
    pause: PauseState,
    passes: u64,
}

impl SamplingEngine {
    pub fn new(probe: Box<dyn HostProbe>, config: CollectorConfig) -> Self {
        Self {
            probe,
            cpu: CpuCollector::new(config.cpu_window),
            memory: MemoryCollector,
            disks: DiskCollector,
            network: NetworkCollector,
            temperature: TemperatureCollector::new(config.sensor_group.clone()),
            processes: ProcessCollector::new(config.max_processes),
            identity: SystemIdentityCollector::default(),
            config,
            sinks: Vec::new(),
            pause: PauseState::default(),
            passes: 0,
        }
    }

    /// Engine reading the real host through `sysinfo`.
    pub fn with_sysinfo(config: CollectorConfig) -> Self {
        let mut probe = SysinfoProbe::new();
        probe.prime();
        Self::new(Box::new(probe), config)
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn add_sink(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(SinkSlot { sink, active: true });
    }

    pub fn active_sinks(&self) -> usize {
        self.sinks.iter().filter(|s| s.active).count()
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Share the pause flag owned by a scheduler.
    pub fn attach_pause(&mut self, pause: PauseState) {
        self.pause = pause;
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Run every enabled collector once and assemble the result.
    ///
    /// A failing collector leaves its category empty and records why; the
    /// other categories are still collected.
    pub fn run_pass(&mut self) -> Snapshot {
        self.passes += 1;
        let probe = self.probe.as_mut();
        let mut failures = Vec::new();

        let system = run_collector(&mut self.identity, probe, &mut failures).unwrap_or_default();
        let cpu = enabled(self.config.collect_cpu, || {
            run_collector(&mut self.cpu, probe, &mut failures)
        });
        let memory = enabled(self.config.collect_memory, || {
            run_collector(&mut self.memory, probe, &mut failures)
        });
        let disks = enabled(self.config.collect_disks, || {
            run_collector(&mut self.disks, probe, &mut failures)
        });
        let network = enabled(self.config.collect_network, || {
            run_collector(&mut self.network, probe, &mut failures)
        });
        let temperature = enabled(self.config.collect_temperatures, || {
            run_collector(&mut self.temperature, probe, &mut failures)
        })
        .unwrap_or_default();
        let processes = enabled(self.config.collect_processes, || {
            run_collector(&mut self.processes, probe, &mut failures)
        });

        Snapshot {
            timestamp: Local::now(),
            cpu,
            memory,
            disks,
            network,
            temperature,
            processes,
            system,
            failures,
        }
    }

    /// Hand `snapshot` to every active sink in registration order.
    pub fn dispatch(&mut self, snapshot: &Snapshot) {
        for slot in self.sinks.iter_mut().filter(|s| s.active) {
            if let Err(e) = slot.sink.consume(snapshot) {
                log::warn!("Sink '{}' failed, deactivating: {}", slot.sink.name(), e);
                slot.active = false;
            }
        }
    }

    /// `run_pass` followed by `dispatch`.
    pub fn sample(&mut self) -> Snapshot {
        let snapshot = self.run_pass();
        self.dispatch(&snapshot);
        snapshot
    }
}

fn enabled<T>(on: bool, f: impl FnOnce() -> Option<T>) -> Option<T> {
    if on {
        f()
    } else {
        None
    }
}

fn run_collector<C: Collector>(
    collector: &mut C,
    probe: &mut dyn HostProbe,
    failures: &mut Vec<CategoryFailure>,
) -> Option<C::Output> {
    match collector.collect(probe) {
        Ok(value) => Some(value),
        Err(e) => {
            record_failure(C::CATEGORY, &e, failures);
            None
        }
    }
}

fn record_failure(
    category: MetricCategory,
    error: &CollectError,
    failures: &mut Vec<CategoryFailure>,
) {
    match error.kind() {
        FailureKind::PartialUnavailable => {
            log::debug!("{} unavailable this pass: {}", category, error)
        }
        FailureKind::CollectorFatal => log::error!("{} collector failed: {}", category, error),
    }
    failures.push(CategoryFailure::new(category, error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::mock::FakeProbe;
    use crate::core::system_monitor::sinks::live_channel;
    use crate::error::{Result, SysmonError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingSink {
        seen: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Sink for CountingSink {
        fn name(&self) -> &str {
            "counting"
        }

        fn consume(&mut self, _snapshot: &Snapshot) -> Result<()> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SysmonError::other("disk full"));
            }
            Ok(())
        }
    }

    fn fast_config() -> CollectorConfig {
        CollectorConfig {
            cpu_window: Duration::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn test_typical_pass_is_complete() {
        let mut engine = SamplingEngine::new(Box::new(FakeProbe::typical()), fast_config());
        let snapshot = engine.run_pass();

        assert!(snapshot.is_complete());
        assert_eq!(snapshot.cpu.unwrap().percent, 12.5);
        assert_eq!(snapshot.memory.unwrap().percent, 25.0);
        assert_eq!(snapshot.disks.as_ref().unwrap().len(), 1);
        assert_eq!(snapshot.temperature.celsius(), Some(48.0));
        assert_eq!(snapshot.processes.as_ref().unwrap().len(), 2);
        assert_eq!(snapshot.system.os_name, "FakeOS");
    }

    #[test]
    fn test_failed_category_does_not_block_others() {
        let probe = FakeProbe::typical()
            .with_cpu_error(CollectError::unavailable("cpu"))
            .with_memory_error(CollectError::fatal("allocation failed"));
        let mut engine = SamplingEngine::new(Box::new(probe), fast_config());
        let snapshot = engine.run_pass();

        assert!(snapshot.cpu.is_none());
        assert!(snapshot.memory.is_none());
        assert!(snapshot.disks.is_some());
        assert!(snapshot.network.is_some());
        assert!(snapshot.processes.is_some());

        assert_eq!(
            snapshot.failure(MetricCategory::Cpu).unwrap().kind,
            FailureKind::PartialUnavailable
        );
        assert_eq!(
            snapshot.failure(MetricCategory::Memory).unwrap().kind,
            FailureKind::CollectorFatal
        );
        assert_eq!(snapshot.failures.len(), 2);
    }

    #[test]
    fn test_disabled_categories_are_absent_without_failure() {
        let mut engine = SamplingEngine::new(
            Box::new(FakeProbe::typical()),
            CollectorConfig::log_record(),
        );
        let snapshot = engine.run_pass();
        assert!(snapshot.processes.is_none());
        assert!(!snapshot.temperature.is_available());
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_failing_sink_is_isolated_and_deactivated() {
        let bad = Arc::new(AtomicUsize::new(0));
        let good = Arc::new(AtomicUsize::new(0));

        let mut engine = SamplingEngine::new(Box::new(FakeProbe::typical()), fast_config());
        engine.add_sink(Box::new(CountingSink {
            seen: bad.clone(),
            fail: true,
        }));
        engine.add_sink(Box::new(CountingSink {
            seen: good.clone(),
            fail: false,
        }));

        engine.sample();
        engine.sample();
        engine.sample();

        assert_eq!(bad.load(Ordering::SeqCst), 1);
        assert_eq!(good.load(Ordering::SeqCst), 3);
        assert_eq!(engine.active_sinks(), 1);
        assert_eq!(engine.passes(), 3);
    }

    #[test]
    fn test_live_sink_receives_pass() {
        let (sink, view) = live_channel();
        let mut engine = SamplingEngine::new(Box::new(FakeProbe::typical()), fast_config());
        engine.add_sink(Box::new(sink));
        engine.sample();
        assert!(view.borrow().is_some());
    }

    #[test]
    fn test_pause_flag_shared() {
        let pause = PauseState::default();
        let mut engine = SamplingEngine::new(Box::new(FakeProbe::new()), fast_config());
        engine.attach_pause(pause.clone());
        assert!(!engine.is_paused());
        pause.toggle();
        assert!(engine.is_paused());
    }
}
