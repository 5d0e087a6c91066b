//! Variable-rate playback controller.
//!
//! Owns the time window, marker engine, seek mediator and sync clock, and
//! implements the fast-forward/rewind state machine on top of them.
//!
//! Rates the engine cannot play natively are presented by pausing the
//! engine and advancing a virtual playhead on a timer. When the simulated
//! excursion ends, a single programmatic seek moves the real engine to where
//! the virtual playhead stopped.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::PlaybackConfig;
use crate::error::{ControllerError, Result};
use crate::host::{MediaEngine, MediaEvent, ReadyState, Scheduler, TimerHandle};
use crate::player::events::{ControllerEvent, EventBus, Subscription};
use crate::player::playback::rate::{self, RateState, DEFAULT_RATE};
use crate::player::playback::{
    AfterSeek, Marker, MarkerCursor, MarkerEngine, MarkerKind, SeekMediator, SeekOrigin,
    SeekOutcome, TimeWindow, TimelineClock,
};
use crate::player::state::SimulationState;

pub struct PlaybackController<E: MediaEngine, S: Scheduler> {
    engine: E,
    scheduler: S,
    config: PlaybackConfig,
    window: TimeWindow,
    markers: MarkerEngine,
    seeker: SeekMediator,
    clock: TimelineClock,
    simulation: Option<SimulationState>,
    /// Set once the end-of-range seek has been issued for the current
    /// excursion; a second clamp seek would swallow the engine's own end
    /// notification.
    end_clamp_issued: bool,
    events: EventBus,
}

impl<E: MediaEngine, S: Scheduler> PlaybackController<E, S> {
    pub fn new(engine: E, scheduler: S, config: PlaybackConfig) -> Self {
        Self {
            markers: MarkerEngine::new(
                config.proximity_threshold,
                config.default_marker_min_duration,
            ),
            seeker: SeekMediator::new(config.min_ready_state),
            clock: TimelineClock::new(config.tick_interval()),
            engine,
            scheduler,
            config,
            window: TimeWindow::new(),
            simulation: None,
            end_clamp_issued: false,
            events: EventBus::new(),
        }
    }

    // === Host access ===

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&mut self) -> Subscription {
        self.events.subscribe()
    }

    // === Inspection ===

    pub fn time_window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn start_time(&self) -> f64 {
        self.window.start_time()
    }

    pub fn end_time(&self) -> f64 {
        self.window.end_time()
    }

    pub fn markers(&self) -> &[Marker] {
        self.markers.markers()
    }

    pub fn default_markers(&self) -> &[Marker] {
        self.markers.default_markers()
    }

    pub fn marker_cursor(&self) -> MarkerCursor {
        self.markers.cursor()
    }

    pub fn is_simulating(&self) -> bool {
        self.simulation.is_some()
    }

    pub fn simulation(&self) -> Option<&SimulationState> {
        self.simulation.as_ref()
    }

    /// Position the view should show: the virtual playhead while
    /// simulating, the engine position otherwise.
    pub fn target_current_time(&self) -> f64 {
        match &self.simulation {
            Some(sim) => sim.virtual_time,
            None => self.engine.position(),
        }
    }

    /// Rate the view should show.
    pub fn target_playback_rate(&self) -> f64 {
        match &self.simulation {
            Some(sim) => sim.target_rate,
            None => self.engine.rate(),
        }
    }

    pub fn rate_state(&self) -> RateState {
        RateState::classify(self.target_playback_rate(), !self.engine.is_paused())
    }

    /// Rate the ladder steps from. A paused engine still counts as rate 1.
    fn logical_rate(&self) -> f64 {
        self.simulation
            .as_ref()
            .map_or(DEFAULT_RATE, |sim| sim.target_rate)
    }

    fn live_edge(&self) -> Option<f64> {
        if self.engine.is_live() {
            self.engine.live_edge()
        } else {
            None
        }
    }

    fn engine_ready(&self) -> bool {
        self.seeker.engine_ready(&self.engine)
    }

    // === Time window ===

    pub fn set_start_time(&mut self, value: f64) -> Result<()> {
        self.window.set_start(value)?;
        self.window_changed();
        Ok(())
    }

    pub fn set_end_time(&mut self, value: f64) -> Result<()> {
        self.window.set_end(value)?;
        self.window_changed();
        Ok(())
    }

    /// Hand the start bound back to media metadata.
    pub fn clear_start_time(&mut self) {
        self.window.clear_start();
        self.window_changed();
    }

    /// Hand the end bound back to media metadata.
    pub fn clear_end_time(&mut self) {
        self.window.clear_end();
        self.window_changed();
    }

    fn window_changed(&mut self) {
        self.markers.regenerate_defaults(&self.window);
        self.events.emit(ControllerEvent::TimeWindowChanged {
            start: self.window.start_time(),
            end: self.window.end_time(),
        });
    }

    // === Markers ===

    pub fn add_marker(
        &mut self,
        time: f64,
        kind: MarkerKind,
        payload: serde_json::Value,
        style: Option<String>,
    ) -> Result<()> {
        let marker = Marker {
            time,
            kind,
            payload,
            style,
        };
        let position = self.target_current_time();
        self.markers.add(marker, position)
    }

    /// Remove every marker at `time`. Returns how many were removed.
    pub fn remove_marker(&mut self, time: f64) -> usize {
        self.markers.remove(time)
    }

    // === Source lifecycle ===

    /// The host is switching to a new media source.
    ///
    /// Explicit markers are cleared when the new metadata arrives unless the
    /// host adds markers in the meantime. Host-set bounds carry over.
    pub fn load_source(&mut self) {
        info!("loading new media source");
        self.leave_simulation(false, false);
        self.markers.mark_needs_reset();
        self.end_clamp_issued = false;
    }

    fn on_metadata_loaded(&mut self, duration: f64) {
        let initial_time = self.engine.initial_time();
        let changed = self.window.on_metadata_loaded(duration, initial_time);
        self.markers.on_metadata_loaded();
        info!(
            duration,
            start = self.window.start_time(),
            end = self.window.end_time(),
            "media metadata loaded"
        );
        if changed {
            self.window_changed();
        } else {
            self.markers.regenerate_defaults(&self.window);
        }
        self.markers.recompute_cursor(self.engine.position());
    }

    // === Rate control ===

    /// Step one rung towards faster forward playback.
    pub fn fast_forward(&mut self) {
        let rate = rate::step_forward(self.logical_rate());
        self.step_rate(rate);
    }

    /// Step one rung towards faster reverse playback.
    pub fn rewind(&mut self) {
        let rate = rate::step_back(self.logical_rate());
        self.step_rate(rate);
    }

    fn step_rate(&mut self, rate: f64) {
        if !self.engine_ready() {
            debug!(
                ready_state = ?self.engine.ready_state(),
                "rate change ignored, engine not ready"
            );
            return;
        }
        if rate::is_native(rate) {
            // Only normal playback is native on the ladder.
            self.leave_simulation(true, true);
        } else {
            self.simulate_rate(rate);
        }
    }

    /// Set an arbitrary rate. Native rates go straight to the engine.
    pub fn set_playback_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            return;
        }
        if rate::is_native(rate) {
            self.leave_simulation(rate != 0.0, true);
            self.engine.set_rate(rate);
            self.events
                .emit(ControllerEvent::TargetRateChanged { rate });
        } else if self.engine_ready() {
            self.simulate_rate(rate);
        } else {
            debug!(rate, "rate change ignored, engine not ready");
        }
    }

    fn simulate_rate(&mut self, rate: f64) {
        let now = self.scheduler.now();
        match self.simulation.as_mut() {
            Some(sim) => {
                debug!(from = sim.target_rate, to = rate, "simulated rate changed");
                sim.retarget(rate, now);
            }
            None => self.enter_simulation(rate),
        }
        self.events
            .emit(ControllerEvent::TargetRateChanged { rate });
    }

    fn enter_simulation(&mut self, rate: f64) {
        let now = self.scheduler.now();
        // A reconciling seek may still be landing; start from where it goes
        // and keep its follow-up from restarting the engine.
        let position = self.seeker.in_flight().unwrap_or(self.engine.position());
        self.seeker.cancel_after_seek();
        self.engine.set_rate(0.0);
        self.engine.pause();
        self.simulation = Some(SimulationState::begin(position, rate, now));
        self.end_clamp_issued = false;
        self.clock.start(&mut self.scheduler);
        debug!(rate, position, "entered simulated playback");
    }

    /// Return to native playback, moving the engine to the virtual playhead.
    pub fn exit_simulation(&mut self, resume_playing: bool) {
        self.leave_simulation(resume_playing, true);
    }

    /// Tear down the simulation. Returns the final virtual time, or `None`
    /// if nothing was being simulated.
    fn leave_simulation(&mut self, resume_playing: bool, reconcile: bool) -> Option<f64> {
        let sim = self.simulation.take()?;
        self.clock.stop(&mut self.scheduler);
        self.engine.set_rate(DEFAULT_RATE);

        let target = sim.virtual_time;
        let mut deferred = false;
        if reconcile && (target - self.engine.position()).abs() > self.config.seek_epsilon {
            match self
                .seeker
                .dispatch(&mut self.engine, target, SeekOrigin::Programmatic)
            {
                Ok(SeekOutcome::Issued { .. }) => {
                    let after = if resume_playing {
                        AfterSeek::Play
                    } else {
                        AfterSeek::Pause
                    };
                    self.seeker.set_after_seek(after);
                    deferred = true;
                }
                Ok(SeekOutcome::Dropped) => {}
                Err(err) => warn!(error = %err, "reconciling seek failed"),
            }
        }

        if !deferred {
            if resume_playing {
                self.engine.play();
            } else {
                self.engine.pause();
            }
        }

        debug!(target, resume_playing, reconcile, "left simulated playback");
        self.events.emit(ControllerEvent::TargetRateChanged { rate: DEFAULT_RATE });
        Some(target)
    }

    // === Play / pause ===

    pub fn play(&mut self) {
        self.seeker.cancel_after_seek();
        if self.leave_simulation(true, true).is_none() {
            self.engine.play();
        }
    }

    pub fn pause(&mut self) {
        self.seeker.cancel_after_seek();
        if self.leave_simulation(false, true).is_none() {
            self.engine.pause();
        }
    }

    pub fn toggle_play_pause(&mut self) {
        self.apply_pending_after_seek();
        if self.simulation.is_some() {
            self.leave_simulation(true, true);
        } else if self.engine.is_paused() {
            self.engine.play();
        } else {
            self.engine.pause();
        }
    }

    /// Run a queued play/pause follow-up now instead of when the pending
    /// seek lands.
    fn apply_pending_after_seek(&mut self) {
        match self.seeker.cancel_after_seek() {
            Some(AfterSeek::Play) => self.engine.play(),
            Some(AfterSeek::Pause) => self.engine.pause(),
            None => {}
        }
    }

    // === Seeking ===

    /// Host-initiated seek. Always attempted; engine failures are returned.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        self.request_seek(time, SeekOrigin::Programmatic).map(|_| ())
    }

    /// User-driven seek (pointer scrub, keys). Dropped while buffering.
    pub fn scrub_to(&mut self, time: f64) -> Result<()> {
        self.request_seek(time, SeekOrigin::User).map(|_| ())
    }

    fn request_seek(&mut self, time: f64, origin: SeekOrigin) -> Result<SeekOutcome> {
        if !time.is_finite() {
            return Err(ControllerError::InvalidTime { value: time });
        }
        self.apply_pending_after_seek();
        self.leave_simulation(true, false);
        let target = self.window.clamp(time, self.live_edge());
        self.seeker.dispatch(&mut self.engine, target, origin)
    }

    pub fn chapter_skip_forward(&mut self) -> Result<()> {
        let position = self.target_current_time();
        let target = self
            .markers
            .next_chapter_after(position)
            .unwrap_or_else(|| self.window.upper_limit(self.live_edge()));
        self.scrub_to(target)
    }

    pub fn chapter_skip_back(&mut self) -> Result<()> {
        let position = self.target_current_time();
        let target = self
            .markers
            .previous_chapter_before(position)
            .unwrap_or_else(|| self.window.start_time());
        self.scrub_to(target)
    }

    pub fn time_skip_forward(&mut self) -> Result<()> {
        let target = self.target_current_time() + self.config.time_skip_forward;
        let target = target.min(self.window.upper_limit(self.live_edge()));
        self.scrub_to(target)
    }

    pub fn time_skip_back(&mut self) -> Result<()> {
        let target = self.target_current_time() - self.config.time_skip_back;
        self.scrub_to(target.max(self.window.start_time()))
    }

    /// Jump to the live edge of a live stream. No-op for bounded media.
    pub fn go_to_live(&mut self) -> Result<()> {
        match self.live_edge() {
            Some(edge) => self.scrub_to(edge),
            None => Ok(()),
        }
    }

    // === Host callbacks ===

    /// Deliver an engine notification.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PositionChanged(position) => self.on_position_changed(position),
            MediaEvent::Seeked(position) => {
                let after = self.seeker.on_seeked();
                self.markers.recompute_cursor(position);
                self.events
                    .emit(ControllerEvent::SeekCompleted { position });
                match after {
                    Some(AfterSeek::Play) => self.engine.play(),
                    Some(AfterSeek::Pause) => self.engine.pause(),
                    None => {}
                }
            }
            MediaEvent::DurationChanged(duration) => self.on_metadata_loaded(duration),
            MediaEvent::Ended => {
                if self.simulation.is_none() {
                    self.events.emit(ControllerEvent::MediaEnded);
                }
            }
        }
    }

    fn on_position_changed(&mut self, position: f64) {
        if self.simulation.is_some() {
            return;
        }

        if self.markers.is_subscribed() {
            for marker in self.markers.on_position_tick(position, false) {
                self.events.emit(ControllerEvent::MarkerReached { marker });
            }
        }

        self.enforce_bounds(position);
    }

    /// Keep native playback inside the window.
    fn enforce_bounds(&mut self, position: f64) {
        if self.engine.ready_state() < ReadyState::Metadata || self.seeker.in_flight().is_some() {
            return;
        }

        let live_edge = self.live_edge();
        let clamped = self.window.clamp(position, live_edge);
        if clamped == position {
            return;
        }

        let past_end = position > clamped;
        if past_end && !self.engine.is_live() {
            self.engine.pause();
        }
        debug!(position, clamped, "position outside time window, clamping");
        if let Err(err) = self
            .seeker
            .dispatch(&mut self.engine, clamped, SeekOrigin::Programmatic)
        {
            warn!(error = %err, "bounds clamp seek failed");
            return;
        }
        if past_end && !self.engine.is_live() {
            self.events.emit(ControllerEvent::EndReached);
        }
    }

    /// A repeating timer fired.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if !self.clock.owns(handle) {
            return;
        }
        let now = self.scheduler.now();
        let Some(sim) = self.simulation.as_mut() else {
            return;
        };

        let raw = sim.advance(now);
        let rate = sim.target_rate;
        let live_edge = self.live_edge();
        let start = self.window.start_time();
        let upper = self.window.upper_limit(live_edge);
        let time = self.window.clamp(raw, live_edge);

        self.events
            .emit(ControllerEvent::TargetTimeUpdated { time });
        if self.config.thumbnails_enabled {
            self.events
                .emit(ControllerEvent::ThumbnailRequested { time });
        }

        if raw >= upper {
            self.on_end_boundary(start, upper);
        } else if raw < start || (raw <= start && rate < 0.0) {
            self.on_start_boundary(start, upper);
        }
    }

    fn pin_virtual_time(&mut self, time: f64) {
        if let Some(sim) = self.simulation.as_mut() {
            sim.pin(time);
        }
    }

    fn on_end_boundary(&mut self, start: f64, upper: f64) {
        if self.end_clamp_issued {
            return;
        }
        self.end_clamp_issued = true;
        let epsilon = self.config.seek_epsilon;

        if self.engine.is_live() {
            debug!(live_edge = upper, "caught up with live edge");
            self.pin_virtual_time((upper - epsilon).max(start));
            self.leave_simulation(true, true);
        } else if self.engine.is_looping() {
            debug!("end of looping media, replaying from start");
            self.pin_virtual_time(start);
            self.leave_simulation(true, true);
        } else {
            self.pin_virtual_time((upper - epsilon).max(start));
            self.leave_simulation(false, true);
            self.events.emit(ControllerEvent::EndReached);
        }
    }

    fn on_start_boundary(&mut self, start: f64, upper: f64) {
        let target = (start + self.config.seek_epsilon).min(upper);
        self.pin_virtual_time(target);
        self.leave_simulation(true, true);
        self.events.emit(ControllerEvent::StartReached);
    }

    /// Interval the sync clock runs at.
    pub fn tick_interval(&self) -> Duration {
        self.clock.interval()
    }
}
