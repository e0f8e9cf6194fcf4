//! mymon - Live MySQL health monitoring library.
//!
//! This library provides the building blocks of the `mymon` dashboard:
//! - `collector` - counter collection against the monitored server
//! - `metrics` - pure conversion of counter samples into rate metrics
//! - `monitor` - snapshot store and the sampling/refresh scheduler
//! - `tui` - terminal dashboard reading from the snapshot store

pub mod collector;
pub mod config;
pub mod metrics;
pub mod monitor;
pub mod tui;
