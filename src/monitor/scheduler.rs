//! Periodic sampling and refresh scheduling.
//!
//! Two independently clocked activities share one cancellation flag:
//! - the sample activity fetches counters, computes the next snapshot and
//!   publishes it to the store;
//! - the refresh activity signals the dashboard to re-read and repaint.
//!
//! A failed fetch skips the tick and leaves the last published snapshot in
//! place, so the dashboard keeps showing the last good numbers instead of
//! blanking. Both activities observe cancellation within one tick; neither
//! restarts on its own.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Local;
use tracing::{debug, error, warn};

use crate::collector::{CounterSource, Sampler};
use crate::config::MonitorConfig;
use crate::metrics::{self, MetricsSnapshot};

use super::store::SnapshotStore;

/// Granularity of the interruptible sleep between ticks.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Owns the two periodic activities until `start` hands them to threads.
pub struct Scheduler<S: CounterSource + Send + 'static> {
    sampler: Sampler<S>,
    store: Arc<SnapshotStore>,
    max_connections: i64,
    sample_interval: Duration,
    refresh_interval: Duration,
    running: Arc<AtomicBool>,
}

impl<S: CounterSource + Send + 'static> Scheduler<S> {
    pub fn new(
        sampler: Sampler<S>,
        store: Arc<SnapshotStore>,
        config: &MonitorConfig,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            sampler,
            store,
            max_connections: config.max_connections,
            sample_interval: config.sample_interval,
            refresh_interval: config.refresh_interval,
            running,
        }
    }

    /// Spawns the sample and refresh threads.
    ///
    /// The first sample runs immediately, so the dashboard has data before
    /// its first paint. `on_refresh` is invoked once per refresh tick and
    /// one final time after cancellation, so a consumer blocked on the
    /// signal observes the shutdown.
    pub fn start<F>(self, on_refresh: F) -> SchedulerHandle
    where
        F: Fn() + Send + 'static,
    {
        let Scheduler {
            mut sampler,
            store,
            max_connections,
            sample_interval,
            refresh_interval,
            running,
        } = self;

        let sample_running = running.clone();
        let sample = thread::spawn(move || {
            let mut prev: Option<MetricsSnapshot> = None;
            while sample_running.load(Ordering::SeqCst) {
                match sampler.sample() {
                    Ok(sample) => {
                        let mut snapshot = metrics::compute(prev.as_ref(), &sample, max_connections);
                        snapshot.slow_queries = sampler.slow_queries().unwrap_or_else(|e| {
                            warn!("slow query read failed: {}", e);
                            Vec::new()
                        });
                        snapshot.blocking_queries = sampler.blocking_queries().unwrap_or_else(|e| {
                            warn!("blocking query read failed: {}", e);
                            Vec::new()
                        });
                        let label = Local::now().format("%H:%M:%S").to_string();
                        store.publish(snapshot.clone(), &label);
                        debug!(
                            "published snapshot: qps={:.1} tps={:.1} connections={}",
                            snapshot.qps, snapshot.tps, snapshot.connections
                        );
                        prev = Some(snapshot);
                    }
                    Err(e) => {
                        // Skip the tick; the last snapshot stays published.
                        warn!("sample failed: {}", e);
                    }
                }
                sleep_interruptibly(sample_interval, &sample_running);
            }
            debug!("sample activity stopped");
        });

        let refresh_running = running.clone();
        let refresh = thread::spawn(move || {
            while refresh_running.load(Ordering::SeqCst) {
                on_refresh();
                sleep_interruptibly(refresh_interval, &refresh_running);
            }
            // Final signal so a consumer blocked on the channel wakes up
            // and sees the cleared flag.
            on_refresh();
            debug!("refresh activity stopped");
        });

        SchedulerHandle { sample, refresh }
    }
}

/// Join handle for a started scheduler. There is no restart: once joined,
/// monitoring resumes only with a new `Scheduler`.
pub struct SchedulerHandle {
    sample: JoinHandle<()>,
    refresh: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Waits for both activities to observe cancellation and exit.
    pub fn join(self) {
        if self.sample.join().is_err() {
            error!("sample thread panicked");
        }
        if self.refresh.join().is_err() {
            error!("refresh thread panicked");
        }
    }
}

/// Sleeps for `interval`, waking early if `running` clears.
fn sleep_interruptibly(interval: Duration, running: &AtomicBool) {
    let mut remaining = interval;
    while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
        let step = remaining.min(SHUTDOWN_POLL_INTERVAL);
        thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}
