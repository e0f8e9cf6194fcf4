//! Event handling for the dashboard.
//!
//! Uses a separate thread to poll for terminal events. Refresh ticks are
//! not generated here: the scheduler's refresh activity sends `Event::Tick`
//! through the cloned sender, keeping the redraw cadence under scheduler
//! control.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};

/// How long the input thread waits for a terminal event per poll.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Dashboard events.
#[derive(Debug)]
pub enum Event {
    /// Refresh signal: re-read the store and repaint.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (width).
    Resize(u16),
}

/// Event handler that polls for terminal events in a separate thread.
pub struct EventHandler {
    rx: Receiver<Event>,
    tx: Sender<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(KEY_POLL_INTERVAL).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let event = match evt {
                        CrosstermEvent::Key(key) => Event::Key(key),
                        CrosstermEvent::Resize(w, _) => Event::Resize(w),
                        _ => continue,
                    };
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, tx }
    }

    /// A sender for injecting events from outside the input thread; the
    /// scheduler's refresh activity uses this for ticks.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
