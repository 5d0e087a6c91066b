//! Fast-forward / rewind rate ladder.
//!
//! The ladder is one ordered sequence with normal playback in the middle:
//!
//! ```text
//! -128 … -4 -2 -0.5 [1] 0.5 2 4 … 128
//! ```
//!
//! Fast-forward moves one rung right, rewind one rung left, so pressing the
//! opposite direction backs off one step towards normal playback instead of
//! jumping straight back to it.

/// Rates reachable through fast-forward and rewind.
pub const RATE_LADDER: [f64; 17] = [
    -128.0, -64.0, -32.0, -16.0, -8.0, -4.0, -2.0, -0.5, 1.0, 0.5, 2.0, 4.0, 8.0, 16.0, 32.0,
    64.0, 128.0,
];

/// Index of normal playback on the ladder.
const NORMAL_RUNG: usize = 8;

/// The engine's native forward rate.
pub const DEFAULT_RATE: f64 = 1.0;

/// Rung for `rate`. Rates off the ladder count as normal playback.
pub fn ladder_index(rate: f64) -> usize {
    RATE_LADDER
        .iter()
        .position(|&rung| rung == rate)
        .unwrap_or(NORMAL_RUNG)
}

/// One step in the fast-forward direction, saturating at the top.
pub fn step_forward(rate: f64) -> f64 {
    let index = (ladder_index(rate) + 1).min(RATE_LADDER.len() - 1);
    RATE_LADDER[index]
}

/// One step in the rewind direction, saturating at the bottom.
pub fn step_back(rate: f64) -> f64 {
    RATE_LADDER[ladder_index(rate).saturating_sub(1)]
}

/// Whether the engine can play `rate` natively. Everything else is
/// presented by pausing the engine and advancing a virtual playhead.
pub fn is_native(rate: f64) -> bool {
    rate == 0.0 || rate == 1.0 || rate == -1.0
}

/// Logical playback state derived from a rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateState {
    /// Native playback (paused or playing)
    Normal { playing: bool },
    /// ±0.5
    SlowMotion(f64),
    /// Rate above 1
    SimulatedFastForward(f64),
    /// Rate below -1
    SimulatedRewind(f64),
}

impl RateState {
    pub fn classify(rate: f64, playing: bool) -> Self {
        if is_native(rate) {
            Self::Normal {
                playing: playing && rate != 0.0,
            }
        } else if rate.abs() < 1.0 {
            Self::SlowMotion(rate)
        } else if rate > 1.0 {
            Self::SimulatedFastForward(rate)
        } else {
            Self::SimulatedRewind(rate)
        }
    }
}
