//! Run subcommand handler

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use tracing::info;

use trickplay::session::{run_script, Script};
use trickplay::Config;

/// Run a script and print its events to stdout, one JSON object per line.
pub fn handle(path: &Path, config: &Config) -> Result<()> {
    let script = Script::load(path)?;
    info!(
        script = %path.display(),
        steps = script.steps.len(),
        "running script"
    );

    let events = run_script(&script, config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in &events {
        serde_json::to_writer(&mut out, event)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
