//! Variable-rate playback controller module
//!
//! Provides trick-play on top of a host media engine: fast-forward and
//! rewind at rates the engine cannot play natively, a start/end time
//! window, timed markers and seek arbitration.
//!
//! # Architecture
//!
//! The player is organized into submodules:
//! - `controller`: `PlaybackController`, the state machine tying everything together
//! - `events`: typed notifications and subscriptions
//! - `state`: SimulationState and shared types (InputResult)
//! - `input/`: Keyboard and mouse input handling
//! - `playback/`: Time window, markers, seeking, rate ladder and sync clock
//!
//! # Usage
//!
//! ```
//! use trickplay::config::PlaybackConfig;
//! use trickplay::host::{ManualScheduler, MediaEvent, SimulatedEngine};
//! use trickplay::player::PlaybackController;
//!
//! let mut controller = PlaybackController::new(
//!     SimulatedEngine::new(120.0),
//!     ManualScheduler::new(),
//!     PlaybackConfig::default(),
//! );
//! let events = controller.subscribe();
//! controller.handle_media_event(MediaEvent::DurationChanged(120.0));
//!
//! controller.fast_forward();
//! assert!(controller.is_simulating());
//! assert!(!events.drain().is_empty());
//! ```

pub mod controller;
pub mod events;
pub mod input;
pub mod playback;
pub mod state;

pub use controller::PlaybackController;
pub use events::{ControllerEvent, EventBus, Subscription};
pub use state::{InputResult, SimulationState};
