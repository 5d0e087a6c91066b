//! Interactive terminal session.
//!
//! Runs the controller against the simulated engine in real time. Keys and
//! pointer input go through [`crate::player::input`]; every controller event
//! is printed as a line above a status line showing position and rate.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{execute, queue};
use tracing::info;

use crate::config::Config;
use crate::host::{MediaEngine, MediaEvent, RealtimeScheduler, SimulatedEngine};
use crate::player::input::handle_event;
use crate::player::{ControllerEvent, InputResult, PlaybackController, Subscription};

type LiveController = PlaybackController<SimulatedEngine, RealtimeScheduler>;

/// Restores the terminal however the session ends.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnableMouseCapture) {
            disable_raw_mode().ok();
            return Err(err.into());
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        execute!(io::stdout(), DisableMouseCapture).ok();
        disable_raw_mode().ok();
        println!();
    }
}

/// Play `engine` interactively until the user quits.
#[cfg(not(tarpaulin_include))]
pub fn run_interactive(engine: SimulatedEngine, config: &Config) -> Result<()> {
    let mut controller = PlaybackController::new(
        engine,
        RealtimeScheduler::new(),
        config.playback.clone(),
    );
    let events = controller.subscribe();
    let duration = controller.engine().duration();
    controller.handle_media_event(MediaEvent::DurationChanged(duration));

    info!(duration, "starting interactive session");
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let mut term_cols = crossterm::terminal::size().map_or(80, |(cols, _)| cols);

    let report_interval = config.session.position_update_interval();
    let mut last_advance = Instant::now();
    let mut last_report = Instant::now();

    loop {
        print_events(&mut stdout, &events)?;
        draw_status(&mut stdout, &controller)?;

        let wait = controller
            .scheduler()
            .until_next_due()
            .unwrap_or(report_interval)
            .min(report_interval.saturating_sub(last_report.elapsed()));

        if event::poll(wait)? {
            let input = event::read()?;
            if handle_event(input, &mut controller, &mut term_cols) == InputResult::Quit {
                break;
            }
        }

        let now = Instant::now();
        controller
            .engine_mut()
            .advance(now.saturating_duration_since(last_advance));
        last_advance = now;
        pump(&mut controller);

        for handle in controller.scheduler_mut().due_timers() {
            controller.on_timer(handle);
        }

        if last_report.elapsed() >= report_interval {
            last_report = Instant::now();
            if !controller.engine().is_paused() {
                let position = controller.engine().position();
                controller.handle_media_event(MediaEvent::PositionChanged(position));
            }
        }
        pump(&mut controller);
    }

    print_events(&mut stdout, &events)?;
    Ok(())
}

fn pump(controller: &mut LiveController) {
    for event in controller.engine_mut().take_events() {
        controller.handle_media_event(event);
    }
}

fn print_events(stdout: &mut Stdout, events: &Subscription) -> Result<()> {
    for event in events.drain() {
        if matches!(
            event,
            ControllerEvent::TargetTimeUpdated { .. } | ControllerEvent::ThumbnailRequested { .. }
        ) {
            continue;
        }
        queue!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        write!(stdout, "{}\r\n", serde_json::to_string(&event)?)?;
    }
    stdout.flush()?;
    Ok(())
}

fn draw_status(stdout: &mut Stdout, controller: &LiveController) -> Result<()> {
    let line = format!(
        "{:>8.2}s / {:.2}s  rate {:>6}  {}  [←/→ rate, space play/pause, n/p chapter, q quit]",
        controller.target_current_time(),
        controller.end_time(),
        controller.target_playback_rate(),
        if controller.is_simulating() {
            "simulated"
        } else if controller.engine().is_paused() {
            "paused"
        } else {
            "playing"
        },
    );
    queue!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    write!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}
