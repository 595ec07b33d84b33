use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::system_monitor::{
    CollectorConfig, LogSessionConfig, DEFAULT_LOG_FILE, DEFAULT_SENSOR_GROUP,
};
use crate::error::{Result, SysmonError};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SYSMON_CONFIG";

pub const KEYS: [&str; 7] = [
    "refresh_interval_ms",
    "cpu_window_ms",
    "sensor_group",
    "max_processes",
    "log_file",
    "log_duration_secs",
    "log_interval_ms",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub refresh_interval_ms: u64,
    pub cpu_window_ms: u64,
    pub sensor_group: String,
    pub max_processes: Option<usize>,
    pub log_file: String,
    pub log_duration_secs: u64,
    pub log_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
            cpu_window_ms: 1000,
            sensor_group: DEFAULT_SENSOR_GROUP.to_string(),
            max_processes: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
            log_duration_secs: 30,
            log_interval_ms: 1000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Missing or empty files give the defaults; so does a corrupted or
    /// invalid file, with a warning, so `config set` can still repair it.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        match serde_json::from_str::<Config>(&data) {
            Ok(config) => match config.validate() {
                Ok(()) => Ok(config),
                Err(e) => {
                    log::warn!("Ignoring invalid config file {}: {}", path.display(), e);
                    Ok(Config::default())
                }
            },
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable config file {}: {}",
                    path.display(),
                    e
                );
                Ok(Config::default())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SysmonError::config("Could not determine config directory"))?;
        Ok(config_dir.join("sysmon").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(SysmonError::config("refresh_interval_ms must be greater than zero"));
        }
        if self.log_interval_ms == 0 {
            return Err(SysmonError::config("log_interval_ms must be greater than zero"));
        }
        if self.log_duration_secs == 0 {
            return Err(SysmonError::config("log_duration_secs must be greater than zero"));
        }
        if self.log_file.trim().is_empty() {
            return Err(SysmonError::config("log_file must not be empty"));
        }
        Ok(())
    }

    /// Update one field from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "refresh_interval_ms" => updated.refresh_interval_ms = parse(key, value)?,
            "cpu_window_ms" => updated.cpu_window_ms = parse(key, value)?,
            "sensor_group" => updated.sensor_group = value.to_string(),
            "max_processes" => {
                updated.max_processes = match value {
                    "" | "none" | "all" => None,
                    v => Some(parse(key, v)?),
                }
            }
            "log_file" => updated.log_file = value.to_string(),
            "log_duration_secs" => updated.log_duration_secs = parse(key, value)?,
            "log_interval_ms" => updated.log_interval_ms = parse(key, value)?,
            _ => {
                return Err(SysmonError::config(format!(
                    "Unknown key '{}'. Valid keys: {}",
                    key,
                    KEYS.join(", ")
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            cpu_window: Duration::from_millis(self.cpu_window_ms),
            sensor_group: self.sensor_group.clone(),
            max_processes: self.max_processes,
            ..CollectorConfig::default()
        }
    }

    pub fn log_session_config(&self) -> LogSessionConfig {
        LogSessionConfig {
            path: PathBuf::from(&self.log_file),
            duration: Duration::from_secs(self.log_duration_secs),
            interval: Duration::from_millis(self.log_interval_ms),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SysmonError::config(format!("Invalid value '{}' for {}", value, key)))
}
