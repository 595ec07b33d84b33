//! Raw access to the operating system.
//!
//! Collectors never talk to the OS directly. They go through [`HostProbe`],
//! which keeps each read small and individually fallible so a collector can
//! decide what to skip. [`SysinfoProbe`] is the real implementation; tests
//! use [`FakeProbe`](super::mock::FakeProbe).

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use sysinfo::{
    Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, Pid, ProcessRefreshKind,
    ProcessStatus, ProcessesToUpdate, RefreshKind, System,
};

use crate::error::CollectError;

use super::metrics::{NetworkMetric, ProcessMetric, SystemIdentity};

/// A mounted partition as enumerated by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub device: String,
    pub mount_point: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceUsage {
    pub used: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub label: String,
    pub celsius: Option<f32>,
}

pub trait HostProbe: Send {
    /// Take baseline readings so that the first delta-based sample is usable.
    fn prime(&mut self) {}

    /// Global CPU utilisation.
    ///
    /// With a non-zero `window` this blocks for the window (never less than
    /// the platform minimum) and measures over it. A zero window measures
    /// since the previous call and returns immediately.
    fn cpu_percent(&mut self, window: Duration) -> Result<f32, CollectError>;

    fn memory(&mut self) -> Result<SpaceUsage, CollectError>;

    fn partitions(&mut self) -> Result<Vec<Partition>, CollectError>;

    fn partition_usage(&mut self, partition: &Partition) -> Result<SpaceUsage, CollectError>;

    fn network_totals(&mut self) -> Result<NetworkMetric, CollectError>;

    fn temperature_sensors(&mut self) -> Result<Vec<SensorReading>, CollectError>;

    /// Pids in enumeration order.
    fn process_ids(&mut self) -> Result<Vec<u32>, CollectError>;

    fn process_detail(&mut self, pid: u32) -> Result<ProcessMetric, CollectError>;

    fn identity(&mut self) -> SystemIdentity;
}

/// [`HostProbe`] backed by the `sysinfo` crate.
pub struct SysinfoProbe {
    system: System,
    disks: Disks,
    networks: Networks,
    components: Components,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
        }
    }

    fn refresh_processes(&mut self) {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SysinfoProbe {
    fn prime(&mut self) {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        self.refresh_processes();
    }

    fn cpu_percent(&mut self, window: Duration) -> Result<f32, CollectError> {
        self.system.refresh_cpu_usage();
        if !window.is_zero() {
            std::thread::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
            self.system.refresh_cpu_usage();
        }
        if self.system.cpus().is_empty() {
            return Err(CollectError::unavailable("cpu usage"));
        }
        Ok(self.system.global_cpu_usage())
    }

    fn memory(&mut self) -> Result<SpaceUsage, CollectError> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(CollectError::unavailable("physical memory"));
        }
        Ok(SpaceUsage {
            used: self.system.used_memory(),
            total,
        })
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, CollectError> {
        self.disks.refresh(true);
        Ok(self
            .disks
            .list()
            .iter()
            .map(|disk| Partition {
                device: disk.name().to_string_lossy().to_string(),
                mount_point: disk.mount_point().to_path_buf(),
            })
            .collect())
    }

    fn partition_usage(&mut self, partition: &Partition) -> Result<SpaceUsage, CollectError> {
        if let Err(e) = std::fs::metadata(&partition.mount_point) {
            let mount = partition.mount_point.display().to_string();
            return Err(match e.kind() {
                io::ErrorKind::PermissionDenied => CollectError::PermissionDenied(mount),
                _ => CollectError::unavailable(format!("partition {}", mount)),
            });
        }

        let disk = self
            .disks
            .list()
            .iter()
            .find(|d| d.mount_point() == partition.mount_point.as_path())
            .ok_or_else(|| {
                CollectError::unavailable(format!(
                    "partition {}",
                    partition.mount_point.display()
                ))
            })?;

        let total = disk.total_space();
        Ok(SpaceUsage {
            used: total.saturating_sub(disk.available_space()),
            total,
        })
    }

    fn network_totals(&mut self) -> Result<NetworkMetric, CollectError> {
        self.networks.refresh(true);
        let (bytes_received, bytes_sent) = self.networks.values().fold((0u64, 0u64), |acc, data| {
            (
                acc.0.saturating_add(data.total_received()),
                acc.1.saturating_add(data.total_transmitted()),
            )
        });
        Ok(NetworkMetric {
            bytes_sent,
            bytes_received,
        })
    }

    fn temperature_sensors(&mut self) -> Result<Vec<SensorReading>, CollectError> {
        self.components.refresh(true);
        let readings: Vec<_> = self
            .components
            .iter()
            .map(|comp| SensorReading {
                label: comp.label().to_string(),
                celsius: comp.temperature(),
            })
            .collect();
        if readings.is_empty() {
            return Err(CollectError::unavailable("temperature sensors"));
        }
        Ok(readings)
    }

    fn process_ids(&mut self) -> Result<Vec<u32>, CollectError> {
        self.system.refresh_memory();
        self.refresh_processes();
        let mut pids: Vec<u32> = self.system.processes().keys().map(|p| p.as_u32()).collect();
        pids.sort_unstable();
        Ok(pids)
    }

    fn process_detail(&mut self, pid: u32) -> Result<ProcessMetric, CollectError> {
        let process = self
            .system
            .process(Pid::from_u32(pid))
            .ok_or(CollectError::Vanished(pid))?;

        if process.status() == ProcessStatus::Zombie {
            return Err(CollectError::Zombie(pid));
        }

        let cpu_count = self.system.cpus().len().max(1) as f32;
        let total_memory = self.system.total_memory();
        let memory_percent = if total_memory > 0 {
            (process.memory() as f64 / total_memory as f64 * 100.0) as f32
        } else {
            0.0
        };

        Ok(ProcessMetric {
            pid,
            name: process.name().to_string_lossy().to_string(),
            cpu_percent: process.cpu_usage() / cpu_count,
            memory_percent,
        })
    }

    fn identity(&mut self) -> SystemIdentity {
        SystemIdentity {
            os_name: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_release: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            architecture: std::env::consts::ARCH.to_string(),
            kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}
