//! End-to-end tests for the sampling pipeline: scheduler, store and mock
//! counter source working together.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use mymon::collector::{Sampler, mock::MockSource};
use mymon::config::MonitorConfig;
use mymon::metrics::{MetricsSnapshot, SlowQueryRow};
use mymon::monitor::{Scheduler, Series, SnapshotStore};

fn test_config() -> MonitorConfig {
    MonitorConfig {
        url: String::new(),
        sample_interval: Duration::from_millis(10),
        refresh_interval: Duration::from_millis(5),
        max_connections: 151,
    }
}

/// Polls the store until `predicate` holds or the deadline passes.
fn wait_for<F>(store: &SnapshotStore, predicate: F) -> MetricsSnapshot
where
    F: Fn(&MetricsSnapshot) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = store.current();
        if predicate(&snapshot) {
            return snapshot;
        }
        assert!(
            Instant::now() < deadline,
            "store never reached the expected state"
        );
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn scheduler_publishes_rates_from_consecutive_samples() {
    let source = MockSource::typical_server();
    let store = Arc::new(SnapshotStore::new());
    let running = Arc::new(AtomicBool::new(true));

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &test_config(),
        running.clone(),
    );
    let handle = scheduler.start(|| {});

    // Second sample: uptime 1000 -> 1010, queries 10000 -> 10800.
    let snapshot = wait_for(&store, |s| s.uptime == 1010);
    assert_eq!(snapshot.qps, 80.0);
    assert_eq!(snapshot.connections, 12);
    assert!(snapshot.tps > 0.0);

    running.store(false, Ordering::SeqCst);
    handle.join();
}

#[test]
fn failed_tick_keeps_the_last_snapshot() {
    let mut source = MockSource::new();
    source.push_sample(&[("Queries", "1000"), ("Uptime", "100")]);
    source.push_sample(&[("Queries", "1100"), ("Uptime", "110")]);
    // Script exhausted afterwards: every further tick fails.

    let store = Arc::new(SnapshotStore::new());
    let running = Arc::new(AtomicBool::new(true));

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &test_config(),
        running.clone(),
    );
    let handle = scheduler.start(|| {});

    let good = wait_for(&store, |s| s.uptime == 110);
    assert_eq!(good.qps, 10.0);

    // Let several failing ticks pass; the published snapshot must not move.
    thread::sleep(Duration::from_millis(100));
    assert_eq!(store.current(), good);

    running.store(false, Ordering::SeqCst);
    handle.join();
}

#[test]
fn first_tick_publishes_gauges_without_rates() {
    let mut source = MockSource::new();
    source.push_sample(&[
        ("Queries", "5000"),
        ("Uptime", "900"),
        ("Threads_connected", "7"),
    ]);

    let store = Arc::new(SnapshotStore::new());
    let running = Arc::new(AtomicBool::new(true));

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &test_config(),
        running.clone(),
    );
    let handle = scheduler.start(|| {});

    let snapshot = wait_for(&store, |s| s.uptime == 900);
    assert_eq!(snapshot.connections, 7);
    assert_eq!(snapshot.qps, 0.0);

    running.store(false, Ordering::SeqCst);
    handle.join();
}

#[test]
fn activity_rows_ride_along_with_the_snapshot() {
    let mut source = MockSource::new();
    source.push_sample(&[("Uptime", "100")]);
    source.set_slow_queries(vec![SlowQueryRow {
        id: 99,
        user: "app".to_string(),
        time_secs: 120,
        ..SlowQueryRow::default()
    }]);

    let store = Arc::new(SnapshotStore::new());
    let running = Arc::new(AtomicBool::new(true));

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &test_config(),
        running.clone(),
    );
    let handle = scheduler.start(|| {});

    let snapshot = wait_for(&store, |s| s.uptime == 100);
    assert_eq!(snapshot.slow_queries.len(), 1);
    assert_eq!(snapshot.slow_queries[0].id, 99);

    running.store(false, Ordering::SeqCst);
    handle.join();
}

#[test]
fn history_grows_one_point_per_published_tick() {
    let source = MockSource::typical_server();
    let store = Arc::new(SnapshotStore::new());
    let running = Arc::new(AtomicBool::new(true));

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &test_config(),
        running.clone(),
    );
    let handle = scheduler.start(|| {});

    wait_for(&store, |s| s.uptime == 1010);
    running.store(false, Ordering::SeqCst);
    handle.join();

    // Two successful ticks published, later ticks failed and added nothing.
    let history = store.history_of(Series::Qps);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].value, 0.0);
    assert_eq!(history[1].value, 80.0);
}

#[test]
fn refresh_activity_signals_until_cancelled() {
    let mut source = MockSource::new();
    source.push_sample(&[("Uptime", "100")]);

    let store = Arc::new(SnapshotStore::new());
    let running = Arc::new(AtomicBool::new(true));
    let refreshes = Arc::new(AtomicUsize::new(0));

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &test_config(),
        running.clone(),
    );
    let counter = refreshes.clone();
    let handle = scheduler.start(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    while refreshes.load(Ordering::SeqCst) < 3 {
        assert!(Instant::now() < deadline, "refresh signals never arrived");
        thread::sleep(Duration::from_millis(2));
    }

    running.store(false, Ordering::SeqCst);
    handle.join();

    // After join the refresh activity is gone; the count stays put.
    let settled = refreshes.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(refreshes.load(Ordering::SeqCst), settled);
}

#[test]
fn cancellation_stops_both_activities_promptly() {
    let source = MockSource::typical_server();
    let store = Arc::new(SnapshotStore::new());
    let running = Arc::new(AtomicBool::new(true));

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &test_config(),
        running.clone(),
    );
    let handle = scheduler.start(|| {});

    wait_for(&store, |s| s.uptime > 0);
    running.store(false, Ordering::SeqCst);

    let started = Instant::now();
    handle.join();
    assert!(started.elapsed() < Duration::from_secs(1));
}
