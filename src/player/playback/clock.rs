//! Timeline sync clock.
//!
//! Owns the repeating timer that drives the virtual playhead while a
//! simulated rate is active. The per-tick work itself lives in
//! [`PlaybackController::on_timer`](crate::player::PlaybackController::on_timer).

use std::time::Duration;

use tracing::debug;

use crate::host::{Scheduler, TimerHandle};

#[derive(Debug, Clone)]
pub struct TimelineClock {
    interval: Duration,
    timer: Option<TimerHandle>,
}

impl TimelineClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timer: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Whether `handle` is this clock's live timer.
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.timer == Some(handle)
    }

    /// Start ticking. A running clock is left alone.
    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S) {
        if self.timer.is_none() {
            let handle = scheduler.start_repeating(self.interval);
            debug!(?handle, interval_ms = self.interval.as_millis() as u64, "sync clock started");
            self.timer = Some(handle);
        }
    }

    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.timer.take() {
            scheduler.stop(handle);
            debug!(?handle, "sync clock stopped");
        }
    }
}
