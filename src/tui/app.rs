//! Main dashboard application.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::monitor::SnapshotStore;

use super::event::{Event, EventHandler};
use super::render::render;
use super::state::DashboardState;

/// Main dashboard application.
///
/// Runs until the user quits or the shared cancellation flag clears. On
/// exit it clears the flag itself, so the scheduler's activities wind down
/// with it.
pub struct App {
    store: Arc<SnapshotStore>,
    running: Arc<AtomicBool>,
    state: DashboardState,
}

impl App {
    pub fn new(store: Arc<SnapshotStore>, running: Arc<AtomicBool>, title: String) -> Self {
        Self {
            store,
            running,
            state: DashboardState::new(title),
        }
    }

    /// Runs the dashboard loop on the given event source.
    pub fn run(mut self, events: EventHandler) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // First read before the first paint; the scheduler has already
        // primed the store with an initial sample.
        self.state.refresh_from(&self.store);

        let mut should_quit = false;
        while !should_quit && self.running.load(Ordering::SeqCst) {
            terminal.draw(|frame| render(frame, &self.state))?;

            match events.next() {
                Ok(Event::Tick) => self.state.refresh_from(&self.store),
                Ok(Event::Key(key)) => {
                    if is_quit_key(&key) {
                        should_quit = true;
                    }
                }
                Ok(Event::Resize(_)) => {
                    // Next draw adapts to the new size.
                }
                Err(_) => should_quit = true,
            }
        }

        self.running.store(false, Ordering::SeqCst);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&press(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&press(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit_key(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&press(KeyCode::Char('x'), KeyModifiers::NONE)));
    }
}
