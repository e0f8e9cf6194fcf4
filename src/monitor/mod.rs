//! Monitoring engine: snapshot store and scheduling.

mod scheduler;
mod store;

pub use scheduler::{Scheduler, SchedulerHandle};
pub use store::{HISTORY_CAPACITY, HistoryPoint, Series, SnapshotStore};
