//! Play subcommand handler

use anyhow::{bail, Result};

use trickplay::host::SimulatedEngine;
use trickplay::session::interactive::run_interactive;
use trickplay::Config;

/// Start an interactive session on a simulated media item.
#[cfg(not(tarpaulin_include))]
pub fn handle(duration: f64, live: bool, looping: bool, config: &Config) -> Result<()> {
    if !duration.is_finite() || duration <= 0.0 {
        bail!("Duration must be a positive number of seconds, got {}", duration);
    }

    let engine = if live {
        SimulatedEngine::live(duration)
    } else {
        SimulatedEngine::new(duration)
    }
    .with_looping(looping);

    run_interactive(engine, config)
}
