//! Scripted [`HostProbe`] for tests.
//!
//! Every read returns what was configured up front, so scenarios such as
//! "one partition denies access" or "a process exits mid-enumeration" can
//! be reproduced without touching the real host.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::CollectError;

use super::metrics::{NetworkMetric, ProcessMetric, SystemIdentity};
use super::probe::{HostProbe, Partition, SensorReading, SpaceUsage};

/// Outcome of reading one partition or process.
#[derive(Debug, Clone)]
enum Scripted<T> {
    Ok(T),
    Err(CollectError),
}

/// Counts calls made against a [`FakeProbe`]; clones share the counters.
#[derive(Debug, Clone, Default)]
pub struct ProbeCalls {
    cpu: Arc<AtomicU64>,
    identity: Arc<AtomicU64>,
}

impl ProbeCalls {
    pub fn cpu(&self) -> u64 {
        self.cpu.load(Ordering::SeqCst)
    }

    pub fn identity(&self) -> u64 {
        self.identity.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct FakeProbe {
    cpu: Result<f32, CollectError>,
    cpu_delay: Duration,
    memory: Result<SpaceUsage, CollectError>,
    partitions: Option<Vec<(Partition, Scripted<SpaceUsage>)>>,
    network: Result<NetworkMetric, CollectError>,
    network_step: u64,
    sensors: Option<Vec<SensorReading>>,
    processes: Vec<(u32, Scripted<ProcessMetric>)>,
    identity: SystemIdentity,
    calls: ProbeCalls,
}

impl FakeProbe {
    /// A host with nothing configured: no partitions, processes or sensors.
    pub fn new() -> Self {
        Self {
            cpu: Ok(0.0),
            cpu_delay: Duration::ZERO,
            memory: Ok(SpaceUsage { used: 0, total: 0 }),
            partitions: Some(Vec::new()),
            network: Ok(NetworkMetric::default()),
            network_step: 0,
            sensors: None,
            processes: Vec::new(),
            identity: SystemIdentity {
                os_name: "FakeOS".to_string(),
                os_release: "1.0".to_string(),
                architecture: "x86_64".to_string(),
                kernel_version: "#1 SMP fake".to_string(),
            },
            calls: ProbeCalls::default(),
        }
    }

    /// A healthy host with one root partition, two processes and a coretemp sensor.
    pub fn typical() -> Self {
        Self::new()
            .with_cpu(12.5)
            .with_memory(4 * 1024 * 1024 * 1024, 16 * 1024 * 1024 * 1024)
            .with_partition("/dev/sda1", "/", 40 * 1024 * 1024 * 1024, 100 * 1024 * 1024 * 1024)
            .with_network(1_500_000, 9_000_000)
            .with_sensor("coretemp Package id 0", Some(48.0))
            .with_process(1, "init", 0.1, 0.2)
            .with_process(512, "sshd", 0.5, 0.4)
    }

    pub fn with_cpu(mut self, percent: f32) -> Self {
        self.cpu = Ok(percent);
        self
    }

    pub fn with_cpu_error(mut self, error: CollectError) -> Self {
        self.cpu = Err(error);
        self
    }

    /// Sleep this long inside every CPU read, standing in for the sampling window.
    pub fn with_cpu_delay(mut self, delay: Duration) -> Self {
        self.cpu_delay = delay;
        self
    }

    pub fn with_memory(mut self, used: u64, total: u64) -> Self {
        self.memory = Ok(SpaceUsage { used, total });
        self
    }

    pub fn with_memory_error(mut self, error: CollectError) -> Self {
        self.memory = Err(error);
        self
    }

    pub fn with_partition(mut self, device: &str, mount: &str, used: u64, total: u64) -> Self {
        self.partitions
            .get_or_insert_with(Vec::new)
            .push((partition(device, mount), Scripted::Ok(SpaceUsage { used, total })));
        self
    }

    /// A partition whose usage read fails with `error`.
    pub fn with_failing_partition(
        mut self,
        device: &str,
        mount: &str,
        error: CollectError,
    ) -> Self {
        self.partitions
            .get_or_insert_with(Vec::new)
            .push((partition(device, mount), Scripted::Err(error)));
        self
    }

    /// Make partition enumeration itself fail.
    pub fn without_partition_table(mut self) -> Self {
        self.partitions = None;
        self
    }

    pub fn with_network(mut self, sent: u64, received: u64) -> Self {
        self.network = Ok(NetworkMetric {
            bytes_sent: sent,
            bytes_received: received,
        });
        self
    }

    /// Grow both counters by `step` bytes on every read.
    pub fn with_network_step(mut self, step: u64) -> Self {
        self.network_step = step;
        self
    }

    pub fn with_network_error(mut self, error: CollectError) -> Self {
        self.network = Err(error);
        self
    }

    pub fn with_sensor(mut self, label: &str, celsius: Option<f32>) -> Self {
        self.sensors.get_or_insert_with(Vec::new).push(SensorReading {
            label: label.to_string(),
            celsius,
        });
        self
    }

    pub fn without_sensors(mut self) -> Self {
        self.sensors = None;
        self
    }

    pub fn with_process(mut self, pid: u32, name: &str, cpu: f32, memory: f32) -> Self {
        self.processes.push((
            pid,
            Scripted::Ok(ProcessMetric {
                pid,
                name: name.to_string(),
                cpu_percent: cpu,
                memory_percent: memory,
            }),
        ));
        self
    }

    /// A process that is enumerated but exits before its details are read.
    pub fn with_vanishing_process(mut self, pid: u32) -> Self {
        self.processes
            .push((pid, Scripted::Err(CollectError::Vanished(pid))));
        self
    }

    pub fn with_failing_process(mut self, pid: u32, error: CollectError) -> Self {
        self.processes.push((pid, Scripted::Err(error)));
        self
    }

    pub fn calls(&self) -> ProbeCalls {
        self.calls.clone()
    }
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn partition(device: &str, mount: &str) -> Partition {
    Partition {
        device: device.to_string(),
        mount_point: mount.into(),
    }
}

impl HostProbe for FakeProbe {
    fn cpu_percent(&mut self, _window: Duration) -> Result<f32, CollectError> {
        self.calls.cpu.fetch_add(1, Ordering::SeqCst);
        if !self.cpu_delay.is_zero() {
            std::thread::sleep(self.cpu_delay);
        }
        self.cpu.clone()
    }

    fn memory(&mut self) -> Result<SpaceUsage, CollectError> {
        self.memory.clone()
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, CollectError> {
        self.partitions
            .as_ref()
            .map(|parts| parts.iter().map(|(p, _)| p.clone()).collect())
            .ok_or_else(|| CollectError::unavailable("partition table"))
    }

    fn partition_usage(&mut self, partition: &Partition) -> Result<SpaceUsage, CollectError> {
        let parts = self
            .partitions
            .as_ref()
            .ok_or_else(|| CollectError::unavailable("partition table"))?;
        match parts.iter().find(|(p, _)| p == partition) {
            Some((_, Scripted::Ok(usage))) => Ok(*usage),
            Some((_, Scripted::Err(e))) => Err(e.clone()),
            None => Err(CollectError::unavailable(format!(
                "partition {}",
                partition.mount_point.display()
            ))),
        }
    }

    fn network_totals(&mut self) -> Result<NetworkMetric, CollectError> {
        let current = self.network.clone()?;
        if let Ok(net) = self.network.as_mut() {
            net.bytes_sent = net.bytes_sent.saturating_add(self.network_step);
            net.bytes_received = net.bytes_received.saturating_add(self.network_step);
        }
        Ok(current)
    }

    fn temperature_sensors(&mut self) -> Result<Vec<SensorReading>, CollectError> {
        self.sensors
            .clone()
            .ok_or_else(|| CollectError::unavailable("temperature sensors"))
    }

    fn process_ids(&mut self) -> Result<Vec<u32>, CollectError> {
        Ok(self.processes.iter().map(|(pid, _)| *pid).collect())
    }

    fn process_detail(&mut self, pid: u32) -> Result<ProcessMetric, CollectError> {
        match self.processes.iter().find(|(p, _)| *p == pid) {
            Some((_, Scripted::Ok(metric))) => Ok(metric.clone()),
            Some((_, Scripted::Err(e))) => Err(e.clone()),
            None => Err(CollectError::Vanished(pid)),
        }
    }

    fn identity(&mut self) -> SystemIdentity {
        self.calls.identity.fetch_add(1, Ordering::SeqCst);
        self.identity.clone()
    }
}
