//! Sessions that drive a controller against the simulated engine.
//!
//! - `script`: deterministic, TOML-scripted runs (used by `trickplay run`)
//! - `interactive`: a raw-mode terminal session with keyboard and mouse
//!   control (used by `trickplay play`)
//!
//! Both are built on [`SimSession`], which plays the role of the host: it
//! moves the engine and the scheduler forward together, delivers the
//! engine's notifications to the controller and fires due timers.

pub mod interactive;
pub mod script;

use std::time::Duration;

use crate::config::Config;
use crate::host::{ManualScheduler, MediaEngine, MediaEvent, SimulatedEngine};
use crate::player::{PlaybackController, Subscription};

pub use script::{run_script, Script};

/// Controller wired to a simulated engine and a manual clock.
pub struct SimSession {
    controller: PlaybackController<SimulatedEngine, ManualScheduler>,
    position_interval: Duration,
    since_position: Duration,
}

impl SimSession {
    pub fn new(engine: SimulatedEngine, config: &Config) -> Self {
        let controller =
            PlaybackController::new(engine, ManualScheduler::new(), config.playback.clone());
        Self {
            controller,
            position_interval: config.session.position_update_interval(),
            since_position: Duration::ZERO,
        }
    }

    pub fn controller(&self) -> &PlaybackController<SimulatedEngine, ManualScheduler> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<SimulatedEngine, ManualScheduler> {
        &mut self.controller
    }

    pub fn subscribe(&mut self) -> Subscription {
        self.controller.subscribe()
    }

    /// Announce the media's metadata, as a real engine does once loaded.
    pub fn open(&mut self) {
        let duration = self.controller.engine().duration();
        self.controller
            .handle_media_event(MediaEvent::DurationChanged(duration));
    }

    /// Deliver everything the engine has queued.
    pub fn pump(&mut self) {
        for event in self.controller.engine_mut().take_events() {
            self.controller.handle_media_event(event);
        }
    }

    /// Let `dt` of session time pass.
    ///
    /// Time is cut at every timer deadline and position report so each is
    /// delivered at the moment it falls due.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        loop {
            let to_report = self.position_interval.saturating_sub(self.since_position);
            let to_timer = self
                .controller
                .scheduler()
                .until_next_due()
                .unwrap_or(Duration::MAX);
            let step = remaining.min(to_report).min(to_timer);

            self.controller.engine_mut().advance(step);
            self.controller.scheduler_mut().advance(step);
            self.since_position += step;
            remaining -= step;
            self.pump();

            let due = self.controller.scheduler_mut().due_timers();
            for handle in due {
                self.controller.on_timer(handle);
            }

            if self.since_position >= self.position_interval {
                self.since_position = Duration::ZERO;
                if !self.controller.engine().is_paused() {
                    let position = self.controller.engine().position();
                    self.controller
                        .handle_media_event(MediaEvent::PositionChanged(position));
                }
            }
            self.pump();

            if remaining.is_zero() {
                break;
            }
        }
    }
}
