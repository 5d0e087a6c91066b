//! Seek dispatch for the playback controller.
//!
//! All position changes go through [`SeekMediator::dispatch`]. User-driven
//! seeks are dropped while the engine is still buffering; programmatic
//! seeks are always attempted and engine failures are returned to the
//! caller.

use tracing::{debug, warn};

use crate::error::{ControllerError, Result};
use crate::host::{MediaEngine, ReadyState};

/// Who asked for a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Keyboard, pointer, remote control
    User,
    /// The host application or the controller itself
    Programmatic,
}

/// What happened to a seek request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekOutcome {
    /// Handed to the engine; completion arrives as a `Seeked` event
    Issued { target: f64 },
    /// Silently discarded
    Dropped,
}

/// Follow-up to run once an in-flight seek completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSeek {
    Play,
    Pause,
}

#[derive(Debug, Clone)]
pub struct SeekMediator {
    min_ready_state: ReadyState,
    in_flight: Option<f64>,
    after_seek: Option<AfterSeek>,
}

impl SeekMediator {
    pub fn new(min_ready_state: ReadyState) -> Self {
        Self {
            min_ready_state,
            in_flight: None,
            after_seek: None,
        }
    }

    /// Whether the engine has buffered enough for user seeks.
    pub fn engine_ready<E: MediaEngine>(&self, engine: &E) -> bool {
        engine.ready_state() >= self.min_ready_state
    }

    /// Target of the most recent seek that has not completed yet.
    pub fn in_flight(&self) -> Option<f64> {
        self.in_flight
    }

    /// Hand an already clamped target to the engine.
    pub fn dispatch<E: MediaEngine>(
        &mut self,
        engine: &mut E,
        target: f64,
        origin: SeekOrigin,
    ) -> Result<SeekOutcome> {
        if origin == SeekOrigin::User && !self.engine_ready(engine) {
            debug!(
                seek_target = target,
                ready_state = ?engine.ready_state(),
                "user seek dropped, engine not ready"
            );
            return Ok(SeekOutcome::Dropped);
        }

        match engine.seek(target) {
            Ok(()) => {
                debug!(seek_target = target, ?origin, "seek issued");
                self.in_flight = Some(target);
                Ok(SeekOutcome::Issued { target })
            }
            Err(source) => match origin {
                SeekOrigin::User => {
                    warn!(seek_target = target, error = %source, "user seek rejected by engine");
                    Ok(SeekOutcome::Dropped)
                }
                SeekOrigin::Programmatic => Err(ControllerError::SeekRejected { target, source }),
            },
        }
    }

    /// Register a one-shot action for when the in-flight seek completes.
    pub fn set_after_seek(&mut self, action: AfterSeek) {
        self.after_seek = Some(action);
    }

    /// Drop the pending follow-up. Returns it so the caller can apply it
    /// immediately instead.
    pub fn cancel_after_seek(&mut self) -> Option<AfterSeek> {
        self.after_seek.take()
    }

    /// The engine finished seeking. Returns the pending follow-up, if any.
    pub fn on_seeked(&mut self) -> Option<AfterSeek> {
        self.in_flight = None;
        self.after_seek.take()
    }
}
