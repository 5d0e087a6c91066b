//! Subcommand handlers

pub mod config;
pub mod play;
pub mod run;

use std::path::Path;

use anyhow::Result;

use trickplay::Config;

/// Load configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
