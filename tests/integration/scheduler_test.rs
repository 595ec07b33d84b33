use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sysmon::core::system_monitor::mock::FakeProbe;
use sysmon::core::system_monitor::{
    CollectorConfig, Control, SamplingEngine, Scheduler, Sink, Snapshot,
};

struct CountingSink(Arc<AtomicUsize>);

impl Sink for CountingSink {
    fn name(&self) -> &str {
        "counting"
    }

    fn consume(&mut self, _snapshot: &Snapshot) -> sysmon::Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn engine_with(probe: FakeProbe, seen: Arc<AtomicUsize>) -> SamplingEngine {
    let config = CollectorConfig {
        cpu_window: Duration::ZERO,
        ..Default::default()
    };
    let mut engine = SamplingEngine::new(Box::new(probe), config);
    engine.add_sink(Box::new(CountingSink(seen)));
    engine
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_paused_loop_only_samples_on_refresh() {
    let probe = FakeProbe::typical();
    let calls = probe.calls();
    let seen = Arc::new(AtomicUsize::new(0));

    let scheduler = Scheduler::new(engine_with(probe, seen.clone()), Duration::from_millis(20));
    scheduler.pause_state().set_paused(true);
    let (handle, rx) = scheduler.channel();
    let task = tokio::spawn(scheduler.run(rx));

    handle.refresh();
    handle.refresh();
    tokio::time::sleep(Duration::from_millis(120)).await;
    handle.shutdown();

    let stats = task.await.unwrap();
    assert_eq!(stats.refreshes, 2);
    assert_eq!(stats.passes, 2);
    assert_eq!(stats.paused_ticks, stats.ticks);
    assert!(stats.ticks >= 2);
    assert_eq!(calls.cpu(), 2);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_running_loop_samples_each_tick() {
    let seen = Arc::new(AtomicUsize::new(0));
    let scheduler = Scheduler::new(
        engine_with(FakeProbe::typical(), seen.clone()),
        Duration::from_millis(20),
    );
    let (handle, rx) = scheduler.channel();
    let task = tokio::spawn(scheduler.run(rx));

    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.send(Control::Pause);
    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.shutdown();

    let stats = task.await.unwrap();
    assert!(stats.passes >= 3, "expected several passes, got {:?}", stats);
    assert!(stats.paused_ticks >= 1, "expected paused ticks, got {:?}", stats);
    assert_eq!(stats.passes, stats.ticks - stats.paused_ticks);
    assert_eq!(seen.load(Ordering::SeqCst) as u64, stats.passes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_passes_do_not_overlap_or_burst() {
    let seen = Arc::new(AtomicUsize::new(0));
    let probe = FakeProbe::typical().with_cpu_delay(Duration::from_millis(50));
    let scheduler = Scheduler::new(engine_with(probe, seen.clone()), Duration::from_millis(10));
    let (handle, rx) = scheduler.channel();

    let started = Instant::now();
    let task = tokio::spawn(scheduler.run(rx));
    tokio::time::sleep(Duration::from_millis(260)).await;
    handle.shutdown();
    let stats = task.await.unwrap();
    let elapsed = started.elapsed();

    // each pass holds the loop for at least 50ms
    let max_passes = elapsed.as_millis() as u64 / 50 + 1;
    assert!(stats.passes >= 1);
    assert!(stats.passes <= max_passes, "{:?} in {:?}", stats, elapsed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_refresh_keeps_tick_cadence() {
    let seen = Arc::new(AtomicUsize::new(0));
    let interval = Duration::from_millis(100);
    let scheduler = Scheduler::new(engine_with(FakeProbe::typical(), seen.clone()), interval);
    let (handle, rx) = scheduler.channel();

    let started = Instant::now();
    let task = tokio::spawn(scheduler.run(rx));
    for _ in 0..10 {
        assert!(handle.refresh());
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    handle.shutdown();
    let stats = task.await.unwrap();
    let elapsed = started.elapsed();

    // refreshes neither add timed ticks nor restart the interval
    let max_ticks = (elapsed.as_millis() / interval.as_millis()) as u64 + 1;
    assert_eq!(stats.refreshes, 10);
    assert!(stats.ticks >= 2, "{:?} in {:?}", stats, elapsed);
    assert!(stats.ticks <= max_ticks, "{:?} in {:?}", stats, elapsed);
    assert_eq!(stats.passes, stats.ticks + stats.refreshes);
    assert_eq!(seen.load(Ordering::SeqCst) as u64, stats.passes);
}
