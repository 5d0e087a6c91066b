//! Playback building blocks for the controller.
//!
//! This module handles the time window, markers, seeking, the rate ladder,
//! and the sync clock that drives simulated fast-forward/rewind.

pub mod clock;
pub mod markers;
pub mod rate;
pub mod seeking;
pub mod window;

pub use clock::TimelineClock;
pub use markers::{
    generate_default_markers, Marker, MarkerCursor, MarkerEngine, MarkerKind, DEFAULT_MARKER_COUNT,
};
pub use rate::{step_back, step_forward, RateState, DEFAULT_RATE, RATE_LADDER};
pub use seeking::{AfterSeek, SeekMediator, SeekOrigin, SeekOutcome};
pub use window::{validate_time, Bound, Provenance, TimeWindow};
