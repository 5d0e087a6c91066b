//! Player state types
//!
//! Contains the simulation state owned by the controller while it presents
//! a fast-forward or rewind, as well as shared types used across player
//! modules.

use std::time::Instant;

/// Result of processing an input event.
///
/// This enum is returned by input handlers to signal control flow
/// decisions to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Keep running
    Continue,
    /// Exit the session
    Quit,
}

/// Virtual playhead used while the real engine is paused.
///
/// Exists only while a simulated rate is active; dropped on exit.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Where the virtual playhead is now (seconds)
    pub virtual_time: f64,
    /// Rate the playhead advances at
    pub target_rate: f64,
    /// Wall clock time of the last advance
    pub last_tick: Instant,
    /// Media seconds travelled since entry (signed)
    pub accumulated: f64,
    /// Engine position when the simulation started
    pub entry_position: f64,
}

impl SimulationState {
    /// Start a simulation at `position`.
    pub fn begin(position: f64, rate: f64, now: Instant) -> Self {
        Self {
            virtual_time: position,
            target_rate: rate,
            last_tick: now,
            accumulated: 0.0,
            entry_position: position,
        }
    }

    /// Move the playhead by the wall time elapsed since the last advance.
    pub fn advance(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_tick).as_secs_f64();
        self.accumulated += elapsed * self.target_rate;
        self.virtual_time = self.accumulated + self.entry_position;
        self.last_tick = now;
        self.virtual_time
    }

    /// Change rate without losing the distance already travelled.
    pub fn retarget(&mut self, rate: f64, now: Instant) {
        self.advance(now);
        self.target_rate = rate;
    }

    /// Force the playhead to `time`.
    pub fn pin(&mut self, time: f64) {
        self.virtual_time = time;
        self.accumulated = time - self.entry_position;
    }
}
