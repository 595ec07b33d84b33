use std::time::Duration;

use sysmon::core::config::Config;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.refresh_interval_ms, 1000);
    assert_eq!(config.sensor_group, "coretemp");
    assert!(config.max_processes.is_none());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.set("log_file", "/tmp/custom.log").unwrap();
    config.set("log_duration_secs", "5").unwrap();
    config.set("cpu_window_ms", "250").unwrap();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.log_session_config().duration, Duration::from_secs(5));
    assert_eq!(
        loaded.collector_config().cpu_window,
        Duration::from_millis(250)
    );
}

#[test]
fn test_config_load_missing_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("absent.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_empty_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, "").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_invalid_stored_values_fall_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"log_interval_ms": 0}"#).unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}
