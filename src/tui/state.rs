//! Dashboard state: the reader-side copy of the published metrics.

use std::collections::HashMap;

use crate::metrics::MetricsSnapshot;
use crate::monitor::{HistoryPoint, Series, SnapshotStore};

/// Everything the renderer needs, copied out of the snapshot store.
///
/// The dashboard owns this copy outright: refreshing replaces it wholesale,
/// so rendering never races the sampling writer.
pub struct DashboardState {
    /// Header line, e.g. `prod (MySQL 8.0.36)`.
    pub title: String,
    pub snapshot: MetricsSnapshot,
    pub history: HashMap<Series, Vec<HistoryPoint>>,
}

impl DashboardState {
    pub fn new(title: String) -> Self {
        Self {
            title,
            snapshot: MetricsSnapshot::default(),
            history: HashMap::new(),
        }
    }

    /// Re-reads the current snapshot and all history windows.
    pub fn refresh_from(&mut self, store: &SnapshotStore) {
        self.snapshot = store.current();
        for series in Series::ALL {
            self.history.insert(series, store.history_of(series));
        }
    }

    /// History window for a series; empty if nothing was published yet.
    pub fn series(&self, series: Series) -> &[HistoryPoint] {
        self.history.get(&series).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_copies_snapshot_and_history() {
        let store = SnapshotStore::new();
        store.publish(
            MetricsSnapshot {
                qps: 42.0,
                ..MetricsSnapshot::default()
            },
            "10:00:00",
        );

        let mut state = DashboardState::new("test".to_string());
        state.refresh_from(&store);

        assert_eq!(state.snapshot.qps, 42.0);
        assert_eq!(state.series(Series::Qps).len(), 1);
        assert_eq!(state.series(Series::Qps)[0].value, 42.0);
    }

    #[test]
    fn series_is_empty_before_first_refresh() {
        let state = DashboardState::new("test".to_string());
        assert!(state.series(Series::Connections).is_empty());
    }
}
