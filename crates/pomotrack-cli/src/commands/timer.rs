use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pomotrack_core::timer::{format_clock, format_session};
use pomotrack_core::{Config, EditKey, Event, Mode, ProjectId};
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::common::{open_app, print_json, CliApp, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run countdowns in the foreground; Ctrl-C pauses and exits
    Run {
        /// Mode to start in (pomodoro, short-break, long-break)
        #[arg(long, default_value = "pomodoro")]
        mode: Mode,
        /// Project to attribute focus time to
        #[arg(long)]
        project: Option<ProjectId>,
        /// Number of countdowns to run back to back
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
    /// Print the session state as JSON
    Status,
    /// Set a mode's duration by typing HHMMSS digits
    Edit {
        /// Up to six digits, e.g. 2500 for 25 minutes or 013059
        digits: String,
        #[arg(long, default_value = "pomodoro")]
        mode: Mode,
    },
}

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load()?;
    let mut app = open_app(&config)?;

    match action {
        TimerAction::Run {
            mode,
            project,
            cycles,
        } => {
            if let Some(pid) = project {
                app.select_project(Some(pid))?;
            }
            if app.engine().mode() != mode {
                app.switch_mode(mode)?;
            }
            let tick = Duration::from_millis(config.timer.tick_interval_ms);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_countdown(&mut app, tick, cycles.max(1)))?;
        }
        TimerAction::Status => {
            print_json(&app.snapshot())?;
        }
        TimerAction::Edit { digits, mode } => {
            let mut events = Vec::new();
            if app.engine().mode() != mode {
                events.extend(app.switch_mode(mode)?);
            }
            events.extend(app.begin_edit());
            for c in digits.chars() {
                let key = EditKey::parse(&c.to_string())
                    .filter(|k| matches!(k, EditKey::Digit(_)))
                    .ok_or_else(|| format!("'{c}' is not a digit"))?;
                events.extend(app.edit_key(key)?);
            }
            events.extend(app.edit_key(EditKey::Enter)?);
            print_json(&events)?;
        }
    }
    Ok(())
}

/// Drive the engine from a tokio interval until `cycles` countdowns have
/// completed or Ctrl-C arrives.
async fn run_countdown(app: &mut CliApp, tick: Duration, cycles: u32) -> CliResult {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut completed = 0;
    let events = app.start()?;
    report(app, &events)?;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let events = app.tick()?;
                report(app, &events)?;
                if events.iter().any(|e| matches!(e, Event::TimerCompleted { .. })) {
                    completed += 1;
                    if completed >= cycles {
                        break;
                    }
                    let events = app.start()?;
                    report(app, &events)?;
                }
            }
            res = &mut shutdown => {
                res?;
                info!("interrupted");
                let events = app.pause()?;
                report(app, &events)?;
                break;
            }
        }
    }
    Ok(())
}

/// Redraw the countdown line on stderr; everything else goes to stdout as
/// one JSON object per line.
fn report(app: &CliApp, events: &[Event]) -> CliResult {
    for event in events {
        match event {
            Event::TimerTicked { remaining_secs } => {
                let mut err = std::io::stderr().lock();
                write!(
                    err,
                    "\r{} {} {}  ",
                    format_session(app.engine().session_count()),
                    app.engine().mode(),
                    format_clock(*remaining_secs)
                )?;
                err.flush()?;
            }
            other => println!("{}", serde_json::to_string(other)?),
        }
    }
    Ok(())
}
