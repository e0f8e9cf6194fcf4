//! Terminal dashboard for the live monitor.
//!
//! The dashboard is a pure reader: it pulls the current snapshot and the
//! bounded history windows from the snapshot store and paints them. It
//! never holds a mutable reference into the store and never touches the
//! write path. Refresh ticks arrive from the scheduler's refresh activity
//! through the event channel.

mod app;
mod event;
mod render;
mod state;

pub use app::App;
pub use event::{Event, EventHandler};
pub use state::DashboardState;
