//! trickplay CLI entry point

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use trickplay::logging::init_logging;

#[cfg(not(feature = "release"))]
const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("TRICKPLAY_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TRICKPLAY_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "trickplay", version = VERSION)]
#[command(about = "Variable-rate playback controller with simulated fast-forward and rewind")]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session and print every event as a JSON line
    Run {
        /// TOML script describing the media, markers, and steps
        script: PathBuf,
    },

    /// Play a simulated media item interactively
    Play {
        /// Media length in seconds (starting live edge with --live)
        #[arg(long, default_value_t = 300.0)]
        duration: f64,

        /// Simulate a live stream
        #[arg(long)]
        live: bool,

        /// Restart from the beginning when the media ends
        #[arg(long = "loop")]
        looping: bool,
    },

    /// Show the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { script } => commands::run::handle(&script, &config),
        Commands::Play {
            duration,
            live,
            looping,
        } => commands::play::handle(duration, live, looping, &config),
        Commands::Config => commands::config::handle_show(&config),
    }
}
