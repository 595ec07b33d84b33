use std::time::Duration;

use crate::error::CollectError;

use super::metrics::*;
use super::probe::HostProbe;

pub const DEFAULT_CPU_WINDOW: Duration = Duration::from_secs(1);
pub const DEFAULT_SENSOR_GROUP: &str = "coretemp";

/// Configuration for metrics collection
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub collect_cpu: bool,
    pub collect_memory: bool,
    pub collect_disks: bool,
    pub collect_network: bool,
    pub collect_temperatures: bool,
    pub collect_processes: bool,
    /// Observation window of the CPU collector. Zero measures since the previous pass.
    pub cpu_window: Duration,
    pub sensor_group: String,
    pub max_processes: Option<usize>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            collect_cpu: true,
            collect_memory: true,
            collect_disks: true,
            collect_network: true,
            collect_temperatures: true,
            collect_processes: true,
            cpu_window: DEFAULT_CPU_WINDOW,
            sensor_group: DEFAULT_SENSOR_GROUP.to_string(),
            max_processes: None,
        }
    }
}

impl CollectorConfig {
    /// The four categories written by the log file sink, CPU sampled without blocking.
    pub fn log_record() -> Self {
        Self {
            collect_temperatures: false,
            collect_processes: false,
            cpu_window: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Produces one metric category per pass.
///
/// Implementations must not let a per-item problem escape: anything that can
/// be skipped is skipped, and only a failure of the whole category is
/// returned as an error.
pub trait Collector {
    type Output;

    const CATEGORY: MetricCategory;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<Self::Output, CollectError>;
}

/// Global CPU utilisation.
///
/// This is the one collector that blocks: it holds the pass for `window` to
/// observe the CPU counters. The window bounds the shortest useful tick.
#[derive(Debug, Clone)]
pub struct CpuCollector {
    window: Duration,
}

impl CpuCollector {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }
}

impl Default for CpuCollector {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_WINDOW)
    }
}

impl Collector for CpuCollector {
    type Output = CpuMetric;
    const CATEGORY: MetricCategory = MetricCategory::Cpu;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<CpuMetric, CollectError> {
        let percent = probe.cpu_percent(self.window)?;
        Ok(CpuMetric {
            percent: clamp_percent(percent),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCollector;

impl Collector for MemoryCollector {
    type Output = MemoryMetric;
    const CATEGORY: MetricCategory = MetricCategory::Memory;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<MemoryMetric, CollectError> {
        let usage = probe.memory()?;
        Ok(MemoryMetric::new(usage.used.min(usage.total), usage.total))
    }
}

/// Usage of every mounted partition, in enumeration order.
///
/// Partitions that refuse access or disappear between enumeration and the
/// usage read are left out.
#[derive(Debug, Clone, Default)]
pub struct DiskCollector;

impl Collector for DiskCollector {
    type Output = Vec<DiskMetric>;
    const CATEGORY: MetricCategory = MetricCategory::Disk;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<Vec<DiskMetric>, CollectError> {
        let partitions = probe.partitions()?;
        let mut disks = Vec::with_capacity(partitions.len());

        for partition in &partitions {
            match probe.partition_usage(partition) {
                Ok(usage) => disks.push(DiskMetric {
                    device: partition.device.clone(),
                    mount_point: partition.mount_point.to_string_lossy().to_string(),
                    used: usage.used.min(usage.total),
                    total: usage.total,
                    percent: percent_of(usage.used, usage.total),
                }),
                Err(CollectError::Fatal(msg)) => return Err(CollectError::Fatal(msg)),
                Err(e) => {
                    log::debug!("Skipping partition {}: {}", partition.mount_point.display(), e);
                }
            }
        }

        Ok(disks)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetworkCollector;

impl Collector for NetworkCollector {
    type Output = NetworkMetric;
    const CATEGORY: MetricCategory = MetricCategory::Network;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<NetworkMetric, CollectError> {
        probe.network_totals()
    }
}

/// First reading of a named sensor group.
///
/// Never fails: no sensor, no reading, or an unsupported platform all come
/// back as [`Temperature::Unavailable`].
#[derive(Debug, Clone)]
pub struct TemperatureCollector {
    sensor_group: String,
}

impl TemperatureCollector {
    pub fn new<S: Into<String>>(sensor_group: S) -> Self {
        Self {
            sensor_group: sensor_group.into().to_lowercase(),
        }
    }
}

impl Default for TemperatureCollector {
    fn default() -> Self {
        Self::new(DEFAULT_SENSOR_GROUP)
    }
}

impl Collector for TemperatureCollector {
    type Output = Temperature;
    const CATEGORY: MetricCategory = MetricCategory::Temperature;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<Temperature, CollectError> {
        let sensors = match probe.temperature_sensors() {
            Ok(sensors) => sensors,
            Err(e) => {
                log::debug!("Temperature unavailable: {}", e);
                return Ok(Temperature::Unavailable);
            }
        };

        let reading = sensors
            .iter()
            .filter(|s| s.label.to_lowercase().starts_with(&self.sensor_group))
            .find_map(|s| s.celsius);

        Ok(match reading {
            Some(celsius) => Temperature::Available(TemperatureMetric { celsius }),
            None => Temperature::Unavailable,
        })
    }
}

/// All processes in enumeration order.
///
/// A process that exits, denies access or turns out to be a zombie while the
/// list is walked is dropped from the result and the walk continues.
#[derive(Debug, Clone, Default)]
pub struct ProcessCollector {
    limit: Option<usize>,
}

impl ProcessCollector {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }
}

impl Collector for ProcessCollector {
    type Output = Vec<ProcessMetric>;
    const CATEGORY: MetricCategory = MetricCategory::Process;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<Vec<ProcessMetric>, CollectError> {
        let pids = probe.process_ids()?;
        let mut processes = Vec::with_capacity(pids.len());

        for pid in pids {
            if self.limit.is_some_and(|limit| processes.len() >= limit) {
                break;
            }
            match probe.process_detail(pid) {
                Ok(mut process) => {
                    process.cpu_percent = clamp_percent(process.cpu_percent);
                    process.memory_percent = clamp_percent(process.memory_percent);
                    processes.push(process);
                }
                Err(e) if e.is_skippable() => {
                    log::trace!("Skipping pid {}: {}", pid, e);
                }
                Err(CollectError::Fatal(msg)) => return Err(CollectError::Fatal(msg)),
                Err(e) => {
                    log::debug!("Skipping pid {}: {}", pid, e);
                }
            }
        }

        Ok(processes)
    }
}

/// OS identity, read on first use and cached for the life of the collector.
#[derive(Debug, Clone, Default)]
pub struct SystemIdentityCollector {
    cached: Option<SystemIdentity>,
}

impl Collector for SystemIdentityCollector {
    type Output = SystemIdentity;
    const CATEGORY: MetricCategory = MetricCategory::SystemIdentity;

    fn collect(&mut self, probe: &mut dyn HostProbe) -> Result<SystemIdentity, CollectError> {
        Ok(self.cached.get_or_insert_with(|| probe.identity()).clone())
    }
}
