//! Host capabilities consumed by the playback controller.
//!
//! The controller never talks to a real decoder or event loop directly.
//! The embedding application supplies:
//!
//! - a [`MediaEngine`] that plays, pauses, seeks and reports position
//! - a [`Scheduler`] that tells time and runs repeating timers
//!
//! Completion of asynchronous engine work (seeks, duration discovery,
//! natural end of media) is delivered back as [`MediaEvent`] values.
//!
//! `sim` and `scheduler` provide in-process implementations used by the
//! CLI sessions and the test-suite.

pub mod scheduler;
pub mod sim;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub use scheduler::{ManualScheduler, RealtimeScheduler};
pub use sim::{EngineCall, SimulatedEngine};

/// How much media the engine has buffered.
///
/// Ordered from least to most ready, so thresholds compare with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadyState {
    /// Nothing is known about the media yet
    Nothing,
    /// Duration and dimensions are known
    Metadata,
    /// The frame at the current position is available
    CurrentData,
    /// Enough data to advance at least a little
    FutureData,
    /// Enough data to play through without stalling
    EnoughData,
}

/// Asynchronous notifications from the media engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Periodic playback position report
    PositionChanged(f64),
    /// A previously issued seek has completed at the given position
    Seeked(f64),
    /// Media metadata is available (or changed)
    DurationChanged(f64),
    /// Playback ran off the end of the media
    Ended,
}

/// A media playback engine.
///
/// Calls are non-blocking from the controller's point of view: `seek`
/// only *issues* the seek, completion arrives later as
/// [`MediaEvent::Seeked`].
pub trait MediaEngine {
    fn play(&mut self);

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Set the engine's native playback rate.
    fn set_rate(&mut self, rate: f64);

    fn rate(&self) -> f64;

    /// Current position in seconds.
    fn position(&self) -> f64;

    /// Media duration in seconds (infinite for live streams).
    fn duration(&self) -> f64;

    fn ready_state(&self) -> ReadyState;

    /// Issue a seek. An error means the engine refused it outright.
    fn seek(&mut self, target: f64) -> Result<(), EngineError>;

    /// Whether the media is an unbounded live stream.
    fn is_live(&self) -> bool {
        false
    }

    /// Most recent available position of a live stream.
    fn live_edge(&self) -> Option<f64> {
        None
    }

    /// Whether the media restarts from the beginning when it ends.
    fn is_looping(&self) -> bool {
        false
    }

    /// Position the media declares as its natural start.
    fn initial_time(&self) -> f64 {
        0.0
    }
}

/// Identifies a repeating timer started through a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Time source and repeating-timer primitive.
///
/// Firing is the host's job: when a timer is due it calls
/// [`PlaybackController::on_timer`](crate::player::PlaybackController::on_timer)
/// with the handle.
pub trait Scheduler {
    /// Monotonic "now".
    fn now(&self) -> Instant;

    /// Start a timer that fires every `interval` until stopped.
    fn start_repeating(&mut self, interval: Duration) -> TimerHandle;

    /// Stop a timer. Unknown handles are ignored.
    fn stop(&mut self, handle: TimerHandle);
}
