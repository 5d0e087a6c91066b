//! Mouse input handling for interactive sessions.
//!
//! Clicking or dragging anywhere on a row scrubs: the column is mapped onto
//! the time window and handed to the controller as a user seek.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use tracing::warn;

use crate::host::{MediaEngine, Scheduler};
use crate::player::controller::PlaybackController;
use crate::player::state::InputResult;

/// Handle a mouse event.
pub fn handle_mouse_event<E: MediaEngine, S: Scheduler>(
    mouse: MouseEvent,
    controller: &mut PlaybackController<E, S>,
    term_cols: u16,
) -> InputResult {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            let live_edge = if controller.engine().is_live() {
                controller.engine().live_edge()
            } else {
                None
            };
            let window = controller.time_window();
            let start = window.start_time();
            let upper = window.upper_limit(live_edge);
            if let Some(time) = column_to_time(mouse.column, term_cols, start, upper) {
                if let Err(err) = controller.scrub_to(time) {
                    warn!(error = %err, "scrub failed");
                }
            }
        }
        _ => {}
    }

    InputResult::Continue
}

/// Map a terminal column onto `[start, end]`. `None` for an unbounded or
/// empty range.
fn column_to_time(column: u16, term_cols: u16, start: f64, end: f64) -> Option<f64> {
    if term_cols == 0 || !end.is_finite() || end <= start {
        return None;
    }
    let last = term_cols.saturating_sub(1).max(1) as f64;
    let ratio = (column as f64 / last).clamp(0.0, 1.0);
    Some(start + ratio * (end - start))
}
