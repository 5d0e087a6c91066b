//! trickplay - variable-rate playback control
//!
//! A playback controller that sits between a media engine and the view
//! layer. It presents fast-forward and rewind at rates the engine cannot
//! play natively by scrubbing a virtual playhead, restricts playback to a
//! start/end time window, fires timed markers and arbitrates seeks.
//!
//! The host supplies a [`host::MediaEngine`] and a [`host::Scheduler`];
//! [`host::SimulatedEngine`] and the bundled schedulers stand in for both
//! in the CLI and in tests.

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod player;
pub mod session;

pub use config::Config;
pub use error::{ControllerError, EngineError};
pub use player::{ControllerEvent, PlaybackController, Subscription};
