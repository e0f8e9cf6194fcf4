//! Pure metrics computation.
//!
//! Converts two consecutive counter samples into a derived snapshot of
//! rates, ratios and gauges. No I/O and no hidden state: the same inputs
//! always produce a bit-identical snapshot.

mod model;

pub use model::{BlockedQueryRow, MetricsSnapshot, RawCounterSample, SlowQueryRow};

/// Computes the published snapshot from the previous snapshot and the
/// current counter sample.
///
/// `prev` is `None` on the first tick; all rates are 0 in that case. A
/// non-positive uptime delta (first tick, or server restart) also zeroes
/// every rate for the tick — no rate signal rather than a garbage spike.
pub fn compute(
    prev: Option<&MetricsSnapshot>,
    curr: &RawCounterSample,
    max_connections: i64,
) -> MetricsSnapshot {
    let queries = curr.queries();
    let transaction_count = curr.transaction_count();
    let bytes_received = curr.bytes_received();
    let bytes_sent = curr.bytes_sent();
    let uptime = curr.uptime();

    let uptime_delta = match prev {
        Some(p) => uptime - p.uptime,
        None => 0,
    };

    MetricsSnapshot {
        connections: curr.threads_connected(),
        max_connections,
        concurrency: curr.threads_running(),
        cache_hit_rate: cache_hit_rate(curr.buffer_read_requests(), curr.buffer_physical_reads()),

        qps: rate(queries, prev.map_or(0, |p| p.queries), uptime_delta),
        tps: rate(
            transaction_count,
            prev.map_or(0, |p| p.transaction_count),
            uptime_delta,
        ),
        io_in_per_sec: io_rate(
            bytes_received,
            prev.map_or(0, |p| p.bytes_received),
            uptime_delta,
        ),
        io_out_per_sec: io_rate(bytes_sent, prev.map_or(0, |p| p.bytes_sent), uptime_delta),

        queries,
        transaction_count,
        bytes_received,
        bytes_sent,
        uptime,

        slow_queries: Vec::new(),
        blocking_queries: Vec::new(),
    }
}

/// Per-second rate of a cumulative counter over the uptime delta.
///
/// Defined as exactly 0 when the delta is non-positive. A regressing
/// counter (stats reset without an uptime reset) contributes a delta of 0,
/// keeping every rate non-negative.
fn rate(curr: i64, prev: i64, uptime_delta: i64) -> f64 {
    if uptime_delta <= 0 {
        return 0.0;
    }
    counter_delta(curr, prev) as f64 / uptime_delta as f64
}

/// Byte-counter rate scaled to KB/s.
fn io_rate(curr: i64, prev: i64, uptime_delta: i64) -> f64 {
    rate(curr, prev, uptime_delta) / 1000.0
}

/// Counter delta, clamped to 0 on regression.
fn counter_delta(curr: i64, prev: i64) -> i64 {
    if curr >= prev { curr - prev } else { 0 }
}

/// Buffer pool hit rate in percent.
///
/// 0 when there were no read requests; clamped into [0, 100] so that noisy
/// instantaneous reads (physical reads exceeding requests) never publish an
/// out-of-range value.
fn cache_hit_rate(read_requests: i64, physical_reads: i64) -> f64 {
    if read_requests == 0 {
        return 0.0;
    }
    let hit = (read_requests - physical_reads) as f64 / read_requests as f64 * 100.0;
    hit.clamp(0.0, 100.0)
}
