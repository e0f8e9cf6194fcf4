//! Scripted counter source for testing.
//!
//! `MockSource` replays a queue of pre-built fetch results, so tests can
//! exercise the sampling pipeline, failure handling and cancellation
//! without a running server.

use std::collections::{HashMap, VecDeque};

use super::{CounterSource, SourceError, StatusScope};
use crate::metrics::{BlockedQueryRow, SlowQueryRow};

/// Scripted implementation of `CounterSource`.
///
/// Each `fetch` pops the next scripted result; once the script is
/// exhausted, every further fetch fails, which exercises the scheduler's
/// skip-tick path.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: VecDeque<Result<HashMap<String, String>, SourceError>>,
    slow: Vec<SlowQueryRow>,
    blocking: Vec<BlockedQueryRow>,
    fetch_count: usize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful fetch returning the given counters.
    pub fn push_sample(&mut self, pairs: &[(&str, &str)]) {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.responses.push_back(Ok(map));
    }

    /// Queues a failed fetch.
    pub fn push_failure(&mut self, message: &str) {
        self.responses
            .push_back(Err(SourceError::Connection(message.to_string())));
    }

    /// Sets the activity rows returned by every `slow_queries` call.
    pub fn set_slow_queries(&mut self, rows: Vec<SlowQueryRow>) {
        self.slow = rows;
    }

    /// Sets the activity rows returned by every `blocking_queries` call.
    pub fn set_blocking_queries(&mut self, rows: Vec<BlockedQueryRow>) {
        self.blocking = rows;
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    /// A server under light, steady load. Two of these in a row produce
    /// non-zero rates.
    pub fn typical_server() -> Self {
        let mut source = Self::new();
        source.push_sample(&[
            ("Queries", "10000"),
            ("Com_insert", "100"),
            ("Com_update", "200"),
            ("Com_delete", "50"),
            ("Bytes_received", "500000"),
            ("Bytes_sent", "900000"),
            ("Uptime", "1000"),
            ("Threads_connected", "10"),
            ("Threads_running", "2"),
            ("Innodb_buffer_pool_read_requests", "40000"),
            ("Innodb_buffer_pool_reads", "400"),
        ]);
        source.push_sample(&[
            ("Queries", "10800"),
            ("Com_insert", "140"),
            ("Com_update", "260"),
            ("Com_delete", "70"),
            ("Bytes_received", "560000"),
            ("Bytes_sent", "1020000"),
            ("Uptime", "1010"),
            ("Threads_connected", "12"),
            ("Threads_running", "3"),
            ("Innodb_buffer_pool_read_requests", "44000"),
            ("Innodb_buffer_pool_reads", "420"),
        ]);
        source
    }
}

impl CounterSource for MockSource {
    fn fetch(&mut self, _scope: StatusScope) -> Result<HashMap<String, String>, SourceError> {
        self.fetch_count += 1;
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::Connection("mock script exhausted".to_string())))
    }

    fn slow_queries(&mut self) -> Result<Vec<SlowQueryRow>, SourceError> {
        Ok(self.slow.clone())
    }

    fn blocking_queries(&mut self) -> Result<Vec<BlockedQueryRow>, SourceError> {
        Ok(self.blocking.clone())
    }
}
