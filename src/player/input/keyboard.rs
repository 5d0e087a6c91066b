//! Keyboard input handling for interactive sessions.
//!
//! Maps key presses onto controller operations: rate stepping, play/pause,
//! chapter and time skips, and jumps to the ends of the window.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::error::Result;
use crate::host::{MediaEngine, Scheduler};
use crate::player::controller::PlaybackController;
use crate::player::state::InputResult;

/// Handle a keyboard event.
pub fn handle_key_event<E: MediaEngine, S: Scheduler>(
    key: KeyEvent,
    controller: &mut PlaybackController<E, S>,
) -> InputResult {
    // Terminals that report releases would otherwise step twice per press.
    if key.kind == KeyEventKind::Release {
        return InputResult::Continue;
    }

    match key.code {
        // === Quit ===
        KeyCode::Char('q') | KeyCode::Esc => return InputResult::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return InputResult::Quit
        }

        // === Rate ===
        KeyCode::Right | KeyCode::Char('l') => controller.fast_forward(),
        KeyCode::Left | KeyCode::Char('j') => controller.rewind(),
        KeyCode::Char(' ') => controller.toggle_play_pause(),

        // === Navigation ===
        KeyCode::Char('n') => report(controller.chapter_skip_forward()),
        KeyCode::Char('p') => report(controller.chapter_skip_back()),
        KeyCode::Char('.') => report(controller.time_skip_forward()),
        KeyCode::Char(',') => report(controller.time_skip_back()),
        KeyCode::Home => {
            let start = controller.start_time();
            report(controller.scrub_to(start));
        }
        KeyCode::End => report(seek_to_end(controller)),
        KeyCode::Char('g') => report(controller.go_to_live()),

        _ => {}
    }

    InputResult::Continue
}

fn seek_to_end<E: MediaEngine, S: Scheduler>(
    controller: &mut PlaybackController<E, S>,
) -> Result<()> {
    let window = controller.time_window();
    let live_edge = if controller.engine().is_live() {
        controller.engine().live_edge()
    } else {
        None
    };
    let end = window.upper_limit(live_edge);
    controller.scrub_to(end)
}

fn report(result: Result<()>) {
    if let Err(err) = result {
        warn!(error = %err, "key action failed");
    }
}
