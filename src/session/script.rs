//! Scripted sessions.
//!
//! A script describes a media item, the markers to place on it and a list
//! of steps to perform. Steps run against a [`SimSession`], so a script
//! always produces the same events.
//!
//! ```toml
//! [media]
//! duration = 120.0
//!
//! [[markers]]
//! time = 30.0
//! kind = "chapter"
//! payload = { title = "Act II" }
//!
//! [[steps]]
//! action = "fast_forward"
//!
//! [[steps]]
//! action = "advance"
//! ms = 1000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::host::{ReadyState, SimulatedEngine};
use crate::player::playback::MarkerKind;
use crate::player::ControllerEvent;

use super::SimSession;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub media: MediaSpec,
    #[serde(default)]
    pub markers: Vec<MarkerSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// The simulated media item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaSpec {
    /// Length in seconds (ignored for live media)
    pub duration: f64,
    pub initial_time: f64,
    /// Live stream; `duration` becomes the starting live edge
    pub live: bool,
    pub looping: bool,
    pub ready_state: ReadyState,
}

impl Default for MediaSpec {
    fn default() -> Self {
        Self {
            duration: 60.0,
            initial_time: 0.0,
            live: false,
            looping: false,
            ready_state: ReadyState::EnoughData,
        }
    }
}

impl MediaSpec {
    pub fn engine(&self) -> SimulatedEngine {
        let mut engine = if self.live {
            SimulatedEngine::live(self.duration)
        } else {
            SimulatedEngine::new(self.duration).with_initial_time(self.initial_time)
        };
        engine = engine.with_looping(self.looping);
        engine.set_ready_state(self.ready_state);
        engine
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerSpec {
    pub time: f64,
    #[serde(default = "default_marker_kind")]
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub style: Option<String>,
}

fn default_marker_kind() -> String {
    MarkerKind::Chapter.name().to_string()
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    FastForward,
    Rewind,
    Play,
    Pause,
    TogglePlayPause,
    SetRate { rate: f64 },
    Seek { time: f64 },
    Scrub { time: f64 },
    SetStart { time: f64 },
    SetEnd { time: f64 },
    ClearStart,
    ClearEnd,
    AddMarker(MarkerSpec),
    RemoveMarker { time: f64 },
    ChapterSkipForward,
    ChapterSkipBack,
    TimeSkipForward,
    TimeSkipBack,
    GoToLive,
    /// Switch to a new media item. Its metadata arrives on the next advance.
    LoadSource { duration: f64 },
    SetReadyState { state: ReadyState },
    Advance { ms: u64 },
}

impl Script {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid script {}", path.display()))
    }
}

/// Run `script` to completion and return every event the controller emitted.
pub fn run_script(script: &Script, config: &Config) -> Result<Vec<ControllerEvent>> {
    let mut session = SimSession::new(script.media.engine(), config);
    let events = session.subscribe();
    session.open();

    for marker in &script.markers {
        add_marker(&mut session, marker).context("Invalid marker")?;
    }

    for (index, step) in script.steps.iter().enumerate() {
        debug!(step = index + 1, ?step, "running script step");
        run_step(&mut session, step).with_context(|| format!("Step {} failed", index + 1))?;
    }

    Ok(events.drain())
}

fn add_marker(session: &mut SimSession, spec: &MarkerSpec) -> Result<()> {
    let kind: MarkerKind = spec.kind.parse()?;
    session.controller_mut().add_marker(
        spec.time,
        kind,
        spec.payload.clone(),
        spec.style.clone(),
    )?;
    Ok(())
}

fn run_step(session: &mut SimSession, step: &Step) -> Result<()> {
    let controller = session.controller_mut();
    match step {
        Step::FastForward => controller.fast_forward(),
        Step::Rewind => controller.rewind(),
        Step::Play => controller.play(),
        Step::Pause => controller.pause(),
        Step::TogglePlayPause => controller.toggle_play_pause(),
        Step::SetRate { rate } => controller.set_playback_rate(*rate),
        Step::Seek { time } => controller.seek(*time)?,
        Step::Scrub { time } => controller.scrub_to(*time)?,
        Step::SetStart { time } => controller.set_start_time(*time)?,
        Step::SetEnd { time } => controller.set_end_time(*time)?,
        Step::ClearStart => controller.clear_start_time(),
        Step::ClearEnd => controller.clear_end_time(),
        Step::AddMarker(spec) => add_marker(session, spec)?,
        Step::RemoveMarker { time } => {
            controller.remove_marker(*time);
        }
        Step::ChapterSkipForward => controller.chapter_skip_forward()?,
        Step::ChapterSkipBack => controller.chapter_skip_back()?,
        Step::TimeSkipForward => controller.time_skip_forward()?,
        Step::TimeSkipBack => controller.time_skip_back()?,
        Step::GoToLive => controller.go_to_live()?,
        Step::LoadSource { duration } => {
            controller.load_source();
            controller.engine_mut().load(*duration);
        }
        Step::SetReadyState { state } => controller.engine_mut().set_ready_state(*state),
        Step::Advance { ms } => session.advance(Duration::from_millis(*ms)),
    }
    Ok(())
}
