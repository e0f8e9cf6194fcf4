//! Shared snapshot store.
//!
//! Owns the single current snapshot and the bounded history windows behind
//! a read/write lock. The sample activity is the only writer; the dashboard
//! and any ad hoc status query are readers. Readers always see a complete
//! snapshot: the writer computes the new value off to the side and swaps it
//! in under the write lock, and no lock is ever held across I/O.

use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock};

use crate::metrics::MetricsSnapshot;

/// Maximum number of points retained per history series.
pub const HISTORY_CAPACITY: usize = 60;

/// Identifies one tracked history series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Connections,
    Concurrency,
    CacheHitRate,
    Qps,
    Tps,
    IoIn,
    IoOut,
}

impl Series {
    pub const ALL: [Series; 7] = [
        Series::Connections,
        Series::Concurrency,
        Series::CacheHitRate,
        Series::Qps,
        Series::Tps,
        Series::IoIn,
        Series::IoOut,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Series::Connections => "connections",
            Series::Concurrency => "concurrency",
            Series::CacheHitRate => "cache_hit_rate",
            Series::Qps => "qps",
            Series::Tps => "tps",
            Series::IoIn => "io_in",
            Series::IoOut => "io_out",
        }
    }

    /// The scalar this series tracks, read out of a snapshot.
    fn value_of(self, snapshot: &MetricsSnapshot) -> f64 {
        match self {
            Series::Connections => snapshot.connections as f64,
            Series::Concurrency => snapshot.concurrency as f64,
            Series::CacheHitRate => snapshot.cache_hit_rate,
            Series::Qps => snapshot.qps,
            Series::Tps => snapshot.tps,
            Series::IoIn => snapshot.io_in_per_sec,
            Series::IoOut => snapshot.io_out_per_sec,
        }
    }
}

/// One point in a history series. The label is the wall-clock time the
/// snapshot was published; insertion order is time order.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Default)]
struct StoreInner {
    current: MetricsSnapshot,
    history: HashMap<Series, VecDeque<HistoryPoint>>,
}

/// Single-writer, multi-reader store for the published snapshot and its
/// history windows.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    inner: RwLock<StoreInner>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a new snapshot, superseding the current one, and appends
    /// one point to every tracked series. Single writer by contract.
    pub fn publish(&self, snapshot: MetricsSnapshot, label: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        for series in Series::ALL {
            let value = series.value_of(&snapshot);
            let window = inner.history.entry(series).or_default();
            if window.len() >= HISTORY_CAPACITY {
                window.pop_front();
            }
            window.push_back(HistoryPoint {
                label: label.to_string(),
                value,
            });
        }
        inner.current = snapshot;
    }

    /// Returns a copy of the current snapshot. Never a partially written
    /// one: publication swaps the whole value under the write lock.
    pub fn current(&self) -> MetricsSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Returns a copy of a series' history window, oldest first. The copy
    /// never aliases the store's internal sequence.
    pub fn history_of(&self, series: Series) -> Vec<HistoryPoint> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .get(&series)
            .map(|window| window.iter().cloned().collect())
            .unwrap_or_default()
    }
}
