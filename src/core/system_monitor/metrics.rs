use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{CollectError, FailureKind};

/// One sampling pass worth of readings.
///
/// A category that could not be read this pass is `None` and has a matching
/// entry in `failures`. A category switched off in the collector config is
/// `None` without a failure entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub cpu: Option<CpuMetric>,
    pub memory: Option<MemoryMetric>,
    pub disks: Option<Vec<DiskMetric>>,
    pub network: Option<NetworkMetric>,
    pub temperature: Temperature,
    pub processes: Option<Vec<ProcessMetric>>,
    pub system: SystemIdentity,
    pub failures: Vec<CategoryFailure>,
}

impl Snapshot {
    /// Empty snapshot stamped with the current local time.
    pub fn empty(system: SystemIdentity) -> Self {
        Self {
            timestamp: Local::now(),
            cpu: None,
            memory: None,
            disks: None,
            network: None,
            temperature: Temperature::Unavailable,
            processes: None,
            system,
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, category: MetricCategory) -> Option<&CategoryFailure> {
        self.failures.iter().find(|f| f.category == category)
    }

    /// The root partition if present, otherwise the first one read.
    pub fn primary_disk(&self) -> Option<&DiskMetric> {
        let disks = self.disks.as_ref()?;
        disks
            .iter()
            .find(|d| d.mount_point == "/")
            .or_else(|| disks.first())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricCategory {
    Cpu,
    Memory,
    Disk,
    Network,
    Temperature,
    Process,
    SystemIdentity,
}

impl MetricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::Cpu => "cpu",
            MetricCategory::Memory => "memory",
            MetricCategory::Disk => "disk",
            MetricCategory::Network => "network",
            MetricCategory::Temperature => "temperature",
            MetricCategory::Process => "process",
            MetricCategory::SystemIdentity => "system",
        }
    }
}

impl std::fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFailure {
    pub category: MetricCategory,
    pub kind: FailureKind,
    pub message: String,
}

impl CategoryFailure {
    pub fn new(category: MetricCategory, error: &CollectError) -> Self {
        Self {
            category,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuMetric {
    pub percent: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetric {
    pub used: u64,
    pub total: u64,
    pub percent: f32,
}

impl MemoryMetric {
    pub fn new(used: u64, total: u64) -> Self {
        Self {
            used: used.min(total),
            total,
            percent: percent_of(used, total),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskMetric {
    pub device: String,
    pub mount_point: String,
    pub used: u64,
    pub total: u64,
    pub percent: f32,
}

/// Cumulative counters since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMetric {
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureMetric {
    pub celsius: f32,
}

/// Temperature is optional: a missing sensor is a value, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Temperature {
    Available(TemperatureMetric),
    #[default]
    Unavailable,
}

impl Temperature {
    pub fn celsius(&self) -> Option<f32> {
        match self {
            Temperature::Available(t) => Some(t.celsius),
            Temperature::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Temperature::Available(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetric {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
}

/// Read once per process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub os_name: String,
    pub os_release: String,
    pub architecture: String,
    pub kernel_version: String,
}

/// `used / total` as a percentage in `[0, 100]`; zero when `total` is zero.
pub fn percent_of(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    clamp_percent((used as f64 / total as f64 * 100.0) as f32)
}

/// Clamp into `[0, 100]`. NaN reads as zero.
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
