//! Data model for counter samples and published metrics.

use std::collections::HashMap;

/// One raw read of the server's status counters.
///
/// Wraps the flat `name -> value` mapping returned by the status queries.
/// Values are reported by the server as text; accessors parse on demand and
/// fall back to 0 for missing or malformed entries, so a single bad counter
/// never takes down a whole tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCounterSample {
    counters: HashMap<String, String>,
}

impl RawCounterSample {
    /// Wraps a counter mapping as returned by a status query.
    pub fn new(counters: HashMap<String, String>) -> Self {
        Self { counters }
    }

    /// Reads a counter as i64. Missing or unparsable values read as 0.
    pub fn counter(&self, name: &str) -> i64 {
        match self.counters.get(name) {
            Some(value) => value.trim().parse().unwrap_or(0),
            None => 0,
        }
    }

    /// Number of counters in the sample. An empty sample is valid.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Returns true if the sample carries no counters.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn queries(&self) -> i64 {
        self.counter("Queries")
    }

    pub fn uptime(&self) -> i64 {
        self.counter("Uptime")
    }

    pub fn com_insert(&self) -> i64 {
        self.counter("Com_insert")
    }

    pub fn com_update(&self) -> i64 {
        self.counter("Com_update")
    }

    pub fn com_delete(&self) -> i64 {
        self.counter("Com_delete")
    }

    /// Write-transaction counter: insert + update + delete commands.
    pub fn transaction_count(&self) -> i64 {
        self.com_insert() + self.com_update() + self.com_delete()
    }

    pub fn bytes_received(&self) -> i64 {
        self.counter("Bytes_received")
    }

    pub fn bytes_sent(&self) -> i64 {
        self.counter("Bytes_sent")
    }

    pub fn threads_connected(&self) -> i64 {
        self.counter("Threads_connected")
    }

    pub fn threads_running(&self) -> i64 {
        self.counter("Threads_running")
    }

    pub fn buffer_read_requests(&self) -> i64 {
        self.counter("Innodb_buffer_pool_read_requests")
    }

    pub fn buffer_physical_reads(&self) -> i64 {
        self.counter("Innodb_buffer_pool_reads")
    }
}

/// A session running longer than the slow threshold, from the processlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlowQueryRow {
    pub id: i64,
    pub user: String,
    pub host: String,
    pub db: Option<String>,
    pub command: String,
    pub time_secs: i64,
    pub state: Option<String>,
    pub info: Option<String>,
}

/// A lock wait that has been pending longer than the blocking threshold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockedQueryRow {
    pub waiting_pid: i64,
    pub waiting_query: Option<String>,
    pub blocking_pid: i64,
    pub blocking_query: Option<String>,
    pub wait_secs: i64,
    /// KILL statement that would release the wait, as suggested by the server.
    pub kill_statement: Option<String>,
}

/// One complete, published set of metrics at a point in time.
///
/// Snapshots are immutable once published: the store swaps the current
/// snapshot wholesale, it never edits one in place. Rate fields are derived
/// from exactly the previous snapshot's carried counters and the uptime
/// delta between the two samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    // Gauges
    pub connections: i64,
    pub max_connections: i64,
    pub concurrency: i64,
    /// Buffer pool hit rate in percent, clamped into [0, 100].
    pub cache_hit_rate: f64,

    // Rates, >= 0 by construction
    pub qps: f64,
    pub tps: f64,
    /// Inbound traffic in KB/s.
    pub io_in_per_sec: f64,
    /// Outbound traffic in KB/s.
    pub io_out_per_sec: f64,

    // Carried counters, needed for the next tick's deltas
    pub queries: i64,
    pub transaction_count: i64,
    pub bytes_received: i64,
    pub bytes_sent: i64,
    pub uptime: i64,

    // Activity sampled on the same tick
    pub slow_queries: Vec<SlowQueryRow>,
    pub blocking_queries: Vec<BlockedQueryRow>,
}
