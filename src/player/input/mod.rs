//! Input handling for interactive sessions.
//!
//! This module handles keyboard and mouse input events, dispatching
//! them to the controller and returning control flow signals.

mod keyboard;
mod mouse;

pub use keyboard::handle_key_event;
pub use mouse::handle_mouse_event;

use crossterm::event::Event;

use crate::host::{MediaEngine, Scheduler};
use crate::player::controller::PlaybackController;
use crate::player::state::InputResult;

/// Handle any input event, dispatching to the appropriate handler.
///
/// `term_cols` is the current terminal width, used to map pointer columns
/// onto the time window. It is updated on resize.
pub fn handle_event<E: MediaEngine, S: Scheduler>(
    event: Event,
    controller: &mut PlaybackController<E, S>,
    term_cols: &mut u16,
) -> InputResult {
    match event {
        Event::Key(key) => handle_key_event(key, controller),
        Event::Mouse(mouse) => handle_mouse_event(mouse, controller, *term_cols),
        Event::Resize(cols, _) => {
            *term_cols = cols;
            InputResult::Continue
        }
        _ => InputResult::Continue, // Ignore focus events, paste, etc.
    }
}
