use std::time::{Duration, Instant};

use sysmon::core::system_monitor::mock::FakeProbe;
use sysmon::core::system_monitor::{LogController, LogSession, LogSessionConfig};
use sysmon::SysmonError;
use tempfile::TempDir;

fn config(dir: &TempDir, duration_ms: u64, interval_ms: u64) -> LogSessionConfig {
    LogSessionConfig {
        path: dir.path().join("system_log.txt"),
        duration: Duration::from_millis(duration_ms),
        interval: Duration::from_millis(interval_ms),
    }
}

#[test]
fn test_session_writes_expected_records_and_stops() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir, 300, 100);
    let probe = FakeProbe::typical().with_network_step(100);

    let started = Instant::now();
    let summary = LogSession::new(config.clone(), Box::new(probe)).run().unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.records, 3);
    assert!(elapsed < Duration::from_millis(300 + 150), "took {:?}", elapsed);

    let contents = std::fs::read_to_string(&config.path).unwrap();
    let blocks: Vec<_> = contents.split("\n\n").filter(|b| !b.is_empty()).collect();
    assert_eq!(blocks.len(), 3);
    for block in &blocks {
        let lines: Vec<_> = block.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("CPU Usage: "));
        assert!(lines[2].starts_with("Memory Usage: "));
        assert!(lines[3].starts_with("Disk Usage: "));
        assert!(lines[4].starts_with("Network Sent: "));
        assert!(lines[5].starts_with("Network Received: "));
    }
    assert!(blocks[0].contains("Network Sent: 1500000"));
    assert!(blocks[2].contains("Network Sent: 1500200"));
    assert!(contents.ends_with("\n\n"));
}

#[test]
fn test_session_truncates_previous_log() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir, 60, 20);
    std::fs::write(&config.path, "old run\n".repeat(100)).unwrap();

    LogSession::new(config.clone(), Box::new(FakeProbe::typical()))
        .run()
        .unwrap();

    let contents = std::fs::read_to_string(&config.path).unwrap();
    assert!(!contents.contains("old run"));
    assert_eq!(contents.matches("CPU Usage:").count(), 3);
}

#[test]
fn test_second_start_rejected_while_active() {
    let temp_dir = TempDir::new().unwrap();
    let controller = LogController::new(config(&temp_dir, 200, 50), || {
        Box::new(FakeProbe::typical())
    });

    let first = controller.start().unwrap();
    assert!(controller.is_active());

    let err = controller.start().err().unwrap();
    assert!(matches!(err, SysmonError::LoggingActive(_)));

    let summary = first.join().unwrap();
    assert_eq!(summary.records, 4);
    assert!(!controller.is_active());

    let again = controller.start().unwrap();
    assert_eq!(again.join().unwrap().records, 4);
}

#[test]
fn test_late_session_closes_by_deadline() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir, 300, 100);
    let probe = FakeProbe::typical().with_cpu_delay(Duration::from_millis(150));

    let started = Instant::now();
    let summary = LogSession::new(config.clone(), Box::new(probe)).run().unwrap();
    let elapsed = started.elapsed();

    assert!(summary.records < config.expected_records());
    assert!(elapsed <= Duration::from_millis(300 + 100), "took {:?}", elapsed);
    let contents = std::fs::read_to_string(&config.path).unwrap();
    assert_eq!(
        contents.matches("CPU Usage:").count() as u64,
        summary.records
    );
}
