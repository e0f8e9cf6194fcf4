//! Counter collection against the monitored MySQL server.
//!
//! The `CounterSource` trait abstracts the server behind the two fixed
//! status queries plus the activity reads, so the monitoring engine can run
//! against a live server (`MysqlSource`) or a scripted mock (`mock::MockSource`)
//! in tests.

pub mod mock;
mod mysql;

pub use mysql::MysqlSource;

use std::collections::HashMap;

use crate::metrics::{BlockedQueryRow, RawCounterSample, SlowQueryRow};

/// Scope of a status counter read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusScope {
    /// Counters for the current session only (`SHOW STATUS`).
    Session,
    /// Server-wide counters (`SHOW GLOBAL STATUS`).
    Global,
}

/// Error type for counter collection.
#[derive(Debug)]
pub enum SourceError {
    /// The connection URL could not be parsed. Surfaced at startup.
    InvalidUrl(String),
    /// Connecting to the server failed.
    Connection(String),
    /// A query failed after the connection was established.
    Query(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::InvalidUrl(msg) => write!(f, "invalid connection url: {}", msg),
            SourceError::Connection(msg) => write!(f, "connection failed: {}", msg),
            SourceError::Query(msg) => write!(f, "query failed: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// A source of server counters and activity rows.
///
/// All operations are plain reads with no side effects on the server.
/// Failure is distinct from an empty result: an empty mapping is a valid,
/// if degenerate, answer.
pub trait CounterSource {
    /// Reads the status counters for the given scope as a flat
    /// `name -> value` mapping.
    fn fetch(&mut self, scope: StatusScope) -> Result<HashMap<String, String>, SourceError>;

    /// Sessions that have been running a statement past the slow threshold.
    fn slow_queries(&mut self) -> Result<Vec<SlowQueryRow>, SourceError>;

    /// Lock waits pending past the blocking threshold.
    fn blocking_queries(&mut self) -> Result<Vec<BlockedQueryRow>, SourceError>;
}

/// Drives one counter fetch per tick against a `CounterSource`.
///
/// The sampler carries no retry logic: failures propagate to the scheduler,
/// which decides what a skipped tick means.
pub struct Sampler<S: CounterSource> {
    source: S,
}

impl<S: CounterSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetches the global status counters as one immutable sample.
    pub fn sample(&mut self) -> Result<RawCounterSample, SourceError> {
        let counters = self.source.fetch(StatusScope::Global)?;
        Ok(RawCounterSample::new(counters))
    }

    pub fn slow_queries(&mut self) -> Result<Vec<SlowQueryRow>, SourceError> {
        self.source.slow_queries()
    }

    pub fn blocking_queries(&mut self) -> Result<Vec<BlockedQueryRow>, SourceError> {
        self.source.blocking_queries()
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockSource;
    use super::*;

    #[test]
    fn sampler_wraps_fetched_counters() {
        let mut source = MockSource::new();
        source.push_sample(&[("Queries", "42"), ("Uptime", "7")]);
        let mut sampler = Sampler::new(source);

        let sample = sampler.sample().unwrap();
        assert_eq!(sample.queries(), 42);
        assert_eq!(sample.uptime(), 7);
    }

    #[test]
    fn sampler_propagates_failure_untouched() {
        let mut source = MockSource::new();
        source.push_failure("server has gone away");
        let mut sampler = Sampler::new(source);

        let err = sampler.sample().unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[test]
    fn empty_mapping_is_a_valid_sample_not_a_failure() {
        let mut source = MockSource::new();
        source.push_sample(&[]);
        let mut sampler = Sampler::new(source);

        let sample = sampler.sample().unwrap();
        assert!(sample.is_empty());
    }
}
