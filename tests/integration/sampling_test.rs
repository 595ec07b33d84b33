use std::time::Duration;

use sysmon::core::system_monitor::mock::FakeProbe;
use sysmon::core::system_monitor::{
    CollectorConfig, MetricCategory, SamplingEngine, Snapshot, Temperature,
};
use sysmon::{CollectError, FailureKind};

fn fast_config() -> CollectorConfig {
    CollectorConfig {
        cpu_window: Duration::ZERO,
        ..Default::default()
    }
}

fn assert_in_range(snapshot: &Snapshot) {
    let in_range = |p: f32| (0.0..=100.0).contains(&p);
    if let Some(cpu) = snapshot.cpu {
        assert!(in_range(cpu.percent));
    }
    if let Some(mem) = snapshot.memory {
        assert!(in_range(mem.percent));
        assert!(mem.used <= mem.total);
    }
    for disk in snapshot.disks.iter().flatten() {
        assert!(in_range(disk.percent));
        assert!(disk.used <= disk.total);
    }
    for process in snapshot.processes.iter().flatten() {
        assert!(in_range(process.cpu_percent));
        assert!(in_range(process.memory_percent));
    }
}

#[test]
fn test_partial_pass_scenario() {
    let probe = FakeProbe::new()
        .with_cpu(37.0)
        .with_memory(2048, 8192)
        .with_partition("/dev/sda1", "/", 50, 100)
        .with_failing_partition(
            "/dev/sda2",
            "/var/lib/private",
            CollectError::PermissionDenied("/var/lib/private".into()),
        )
        .with_partition("/dev/sdb1", "/home", 10, 40)
        .with_network(4096, 8192)
        .without_sensors()
        .with_process(100, "postgres", 3.0, 1.5)
        .with_vanishing_process(101);

    let mut engine = SamplingEngine::new(Box::new(probe), fast_config());
    let snapshot = engine.run_pass();

    let disks = snapshot.disks.as_ref().unwrap();
    assert_eq!(disks.len(), 2);
    assert_eq!(disks[0].device, "/dev/sda1");
    assert_eq!(disks[1].device, "/dev/sdb1");

    assert_eq!(snapshot.temperature, Temperature::Unavailable);

    let processes = snapshot.processes.as_ref().unwrap();
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].name, "postgres");

    assert_eq!(snapshot.cpu.unwrap().percent, 37.0);
    assert_eq!(snapshot.memory.unwrap().percent, 25.0);
    assert_eq!(snapshot.network.unwrap().bytes_received, 8192);
    assert_eq!(snapshot.system.os_name, "FakeOS");

    // skipped items and a missing sensor are not failures of the pass
    assert!(snapshot.is_complete());
    assert_in_range(&snapshot);
}

#[test]
fn test_out_of_range_readings_are_clamped() {
    let probe = FakeProbe::new()
        .with_cpu(f32::NAN)
        .with_memory(9000, 4000)
        .with_partition("/dev/odd", "/", 700, 500)
        .with_process(9, "runaway", 800.0, 120.0);

    let mut engine = SamplingEngine::new(Box::new(probe), fast_config());
    let snapshot = engine.run_pass();

    assert_eq!(snapshot.cpu.unwrap().percent, 0.0);
    assert_eq!(snapshot.memory.unwrap().percent, 100.0);
    assert_in_range(&snapshot);
}

#[test]
fn test_each_category_fails_alone() {
    let probe = FakeProbe::typical()
        .without_partition_table()
        .with_network_error(CollectError::fatal("counter overflow"));

    let mut engine = SamplingEngine::new(Box::new(probe), fast_config());
    let snapshot = engine.run_pass();

    assert!(snapshot.disks.is_none());
    assert!(snapshot.network.is_none());
    assert_eq!(
        snapshot.failure(MetricCategory::Disk).unwrap().kind,
        FailureKind::PartialUnavailable
    );
    assert_eq!(
        snapshot.failure(MetricCategory::Network).unwrap().kind,
        FailureKind::CollectorFatal
    );

    assert!(snapshot.cpu.is_some());
    assert!(snapshot.memory.is_some());
    assert!(snapshot.processes.is_some());
    assert!(snapshot.temperature.is_available());
}

#[test]
fn test_next_pass_retries_naturally() {
    let mut engine = SamplingEngine::new(Box::new(FakeProbe::typical()), fast_config());
    let first = engine.run_pass();
    let second = engine.run_pass();
    assert!(second.timestamp >= first.timestamp);
    assert_eq!(engine.passes(), 2);
}
