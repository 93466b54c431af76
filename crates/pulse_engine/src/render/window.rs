//! Window system contract and the headless implementation

use std::mem;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::input::InputEvent;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing library failed to initialize
    #[error("window system initialization failed: {0}")]
    InitializationFailed(String),

    /// The window itself could not be created
    #[error("window creation failed")]
    CreationFailed,
}

/// The engine's view of a window
///
/// The frame loop polls it once per frame, drains its translated input
/// events, pushes the frame-rate title, and stops when it asks to close.
pub trait WindowSystem {
    /// Whether the window wants the application to stop
    fn should_close(&self) -> bool;

    /// Pump the platform event queue
    fn poll_events(&mut self);

    /// Take all input events gathered since the last drain
    fn drain_events(&mut self) -> Vec<InputEvent>;

    /// Replace the window title
    fn set_title(&mut self, title: &str);
}

#[derive(Debug, Default)]
struct WindowState {
    frame_budget: Option<u64>,
    close_requested: bool,
    queued: Vec<InputEvent>,
    delivered: Vec<InputEvent>,
    title: String,
    polls: u64,
}

/// Window that exists only as state, for tests and server-side runs
///
/// Events queued through [`HeadlessWindow::push_event`] are delivered by the
/// next poll, the way a platform queue would deliver them. An optional frame
/// budget closes the window after a fixed number of polls. Clones share one
/// underlying window, so a handle kept outside the engine still observes and
/// steers the window the engine drives.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWindow {
    state: Arc<Mutex<WindowState>>,
}

impl HeadlessWindow {
    /// Create a window that stays open until closed explicitly
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a window that closes itself after `frames` polls
    pub fn with_frame_budget(frames: u64) -> Self {
        let window = Self::new();
        window.state.lock().unwrap().frame_budget = Some(frames);
        window
    }

    /// Queue an event for delivery at the next poll
    pub fn push_event(&self, event: InputEvent) {
        self.state.lock().unwrap().queued.push(event);
    }

    /// Ask the window to close at the end of the current frame
    pub fn request_close(&self) {
        self.state.lock().unwrap().close_requested = true;
    }

    /// Title most recently set by the frame loop
    pub fn title(&self) -> String {
        self.state.lock().unwrap().title.clone()
    }

    /// Number of polls performed
    pub fn polls(&self) -> u64 {
        self.state.lock().unwrap().polls
    }
}

impl WindowSystem for HeadlessWindow {
    fn should_close(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.close_requested || state.frame_budget == Some(0)
    }

    fn poll_events(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        if let Some(remaining) = &mut state.frame_budget {
            *remaining = remaining.saturating_sub(1);
        }
        let mut queued = mem::take(&mut state.queued);
        state.delivered.append(&mut queued);
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        mem::take(&mut self.state.lock().unwrap().delivered)
    }

    fn set_title(&mut self, title: &str) {
        self.state.lock().unwrap().title = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn frame_budget_counts_down_to_close() {
        let mut window = HeadlessWindow::with_frame_budget(2);
        assert!(!window.should_close());

        window.poll_events();
        assert!(!window.should_close());

        window.poll_events();
        assert!(window.should_close());
    }

    #[test]
    fn events_wait_for_a_poll_before_delivery() {
        let mut window = HeadlessWindow::new();
        window.push_event(InputEvent::Key {
            key: KeyCode::W,
            pressed: true,
        });

        assert!(window.drain_events().is_empty());

        window.poll_events();
        let events = window.drain_events();
        assert_eq!(events.len(), 1);

        // A drain consumes; nothing is delivered twice.
        assert!(window.drain_events().is_empty());
    }

    #[test]
    fn handles_share_the_same_window() {
        let handle = HeadlessWindow::new();
        let mut engine_side = handle.clone();

        handle.push_event(InputEvent::Key {
            key: KeyCode::F,
            pressed: true,
        });
        engine_side.poll_events();
        assert_eq!(engine_side.drain_events().len(), 1);

        engine_side.set_title("shared");
        assert_eq!(handle.title(), "shared");

        handle.request_close();
        assert!(engine_side.should_close());
    }
}
