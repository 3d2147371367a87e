//! Helpers shared by the CLI commands.

use std::io::Write;

use pomotrack_core::notify::{AudioCue, Notifier, NotifyError, Silent, Tone};
use pomotrack_core::{App, Config, Database, SystemClock};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub type CliApp = App<Database, SystemClock>;

/// Open the on-disk store and build the application context, wiring the
/// completion cues according to `config`.
pub fn open_app(config: &Config) -> CliResult<CliApp> {
    let db = Database::open()?;
    let app = App::load(db, SystemClock)
        .with_long_break_interval(config.timer.pomodoros_before_long_break);
    let app = if config.notifications.enabled {
        app.with_notifier(TerminalNotifier)
    } else {
        app.with_notifier(Silent)
    };
    let app = if config.notifications.sound {
        app.with_audio_cue(TerminalBell)
    } else {
        app.with_audio_cue(Silent)
    };
    Ok(app)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes completion messages to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let mut err = std::io::stderr().lock();
        writeln!(err, "\n{title} {body}").map_err(|e| NotifyError::Unavailable(e.to_string()))
    }
}

/// Rings the terminal bell in place of the synthesized tone.
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&self, _tone: &Tone) {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\x07");
        let _ = err.flush();
    }
}
