//! Simulated media engine.
//!
//! Plays an imaginary media item of a given duration. Seeks are queued and
//! only complete on the next [`advance`](SimulatedEngine::advance), which
//! mirrors the asynchronous completion of a real decoder. Every control call
//! is recorded so callers can inspect what the controller asked for.

use std::time::Duration;

use crate::error::EngineError;

use super::{MediaEngine, MediaEvent, ReadyState};

/// A control call received by the simulated engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCall {
    Play,
    Pause,
    SetRate(f64),
    Seek(f64),
}

/// In-process stand-in for a real media engine.
#[derive(Debug, Clone)]
pub struct SimulatedEngine {
    position: f64,
    duration: f64,
    rate: f64,
    paused: bool,
    ready_state: ReadyState,
    live: bool,
    live_edge: f64,
    looping: bool,
    initial_time: f64,
    pending_seek: Option<f64>,
    reject_seeks: Option<EngineError>,
    events: Vec<MediaEvent>,
    calls: Vec<EngineCall>,
}

impl SimulatedEngine {
    /// A paused, fully buffered media item of `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration,
            rate: 1.0,
            paused: true,
            ready_state: ReadyState::EnoughData,
            live: false,
            live_edge: 0.0,
            looping: false,
            initial_time: 0.0,
            pending_seek: None,
            reject_seeks: None,
            events: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// A live stream whose live edge starts at `edge` and grows in real time.
    pub fn live(edge: f64) -> Self {
        Self {
            duration: f64::INFINITY,
            live: true,
            live_edge: edge,
            position: edge,
            ..Self::new(f64::INFINITY)
        }
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_initial_time(mut self, initial_time: f64) -> Self {
        self.initial_time = initial_time;
        self.position = initial_time;
        self
    }

    pub fn set_ready_state(&mut self, ready_state: ReadyState) {
        self.ready_state = ready_state;
    }

    /// Make every subsequent seek fail with `error` (or succeed again with `None`).
    pub fn reject_seeks(&mut self, error: Option<EngineError>) {
        self.reject_seeks = error;
    }

    /// Swap in a new media item, announcing its duration.
    pub fn load(&mut self, duration: f64) {
        self.duration = duration;
        self.position = if self.live {
            self.live_edge
        } else {
            self.initial_time
        };
        self.pending_seek = None;
        self.paused = true;
        self.events.push(MediaEvent::DurationChanged(duration));
    }

    /// Let `dt` of wall-clock time pass.
    ///
    /// Completes any queued seek first, then moves the playhead if playing.
    pub fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f64();
        if self.live {
            self.live_edge += secs;
        }

        if let Some(target) = self.pending_seek.take() {
            self.position = target;
            self.events.push(MediaEvent::Seeked(target));
        }

        if self.paused || self.rate == 0.0 {
            return;
        }

        self.position = (self.position + secs * self.rate).max(0.0);

        if self.live {
            self.position = self.position.min(self.live_edge);
        } else if self.position >= self.duration {
            if self.looping {
                self.position = self.initial_time;
            } else {
                self.position = self.duration;
                self.paused = true;
                self.events.push(MediaEvent::Ended);
            }
        }
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_seek(&self) -> bool {
        self.pending_seek.is_some()
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Targets of every seek issued so far.
    pub fn seeks(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Seek(target) => Some(*target),
                _ => None,
            })
            .collect()
    }
}

impl MediaEngine for SimulatedEngine {
    fn play(&mut self) {
        self.calls.push(EngineCall::Play);
        if !self.live && self.position >= self.duration {
            self.position = self.initial_time;
        }
        self.paused = false;
    }

    fn pause(&mut self) {
        self.calls.push(EngineCall::Pause);
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_rate(&mut self, rate: f64) {
        self.calls.push(EngineCall::SetRate(rate));
        self.rate = rate;
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn seek(&mut self, target: f64) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Seek(target));
        if let Some(error) = &self.reject_seeks {
            return Err(error.clone());
        }
        if self.ready_state < ReadyState::Metadata {
            return Err(EngineError::NotReady);
        }
        let upper = if self.live {
            self.live_edge
        } else {
            self.duration
        };
        if !target.is_finite() || target < 0.0 || target > upper {
            return Err(EngineError::OutOfRange { target });
        }
        self.pending_seek = Some(target);
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn live_edge(&self) -> Option<f64> {
        self.live.then_some(self.live_edge)
    }

    fn is_looping(&self) -> bool {
        self.looping
    }

    fn initial_time(&self) -> f64 {
        self.initial_time
    }
}
