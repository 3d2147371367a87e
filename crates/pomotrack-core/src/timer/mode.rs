use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ValidationError;

/// Longest duration a mode may be configured to, in minutes.
pub const MAX_MODE_MINUTES: u32 = 180;

/// Completed pomodoros per long break unless configured otherwise.
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Pomodoro, Mode::ShortBreak, Mode::LongBreak];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Pomodoro => "Pomodoro",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Wire name, as stored in the `settings` record.
    pub fn key(self) -> &'static str {
        match self {
            Mode::Pomodoro => "pomodoro",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pomodoro" | "focus" => Ok(Mode::Pomodoro),
            "shortBreak" | "short-break" | "short" => Ok(Mode::ShortBreak),
            "longBreak" | "long-break" | "long" => Ok(Mode::LongBreak),
            other => Err(format!(
                "unknown mode '{other}' (expected pomodoro, short-break or long-break)"
            )),
        }
    }
}

/// Configured minutes per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_pomodoro")]
    pub pomodoro: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
}

fn default_pomodoro() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro: default_pomodoro(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl Settings {
    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Pomodoro => self.pomodoro,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    pub fn duration_secs(&self, mode: Mode) -> u64 {
        u64::from(self.minutes(mode)) * 60
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::DurationOutOfRange`] unless `1..=180`.
    pub fn set_minutes(&mut self, mode: Mode, minutes: u32) -> Result<(), ValidationError> {
        if !(1..=MAX_MODE_MINUTES).contains(&minutes) {
            return Err(ValidationError::DurationOutOfRange { mode, minutes });
        }
        *self.slot_mut(mode) = minutes;
        Ok(())
    }

    /// Replace out-of-range values with the defaults for their mode.
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        for mode in Mode::ALL {
            let minutes = self.minutes(mode);
            if !(1..=MAX_MODE_MINUTES).contains(&minutes) {
                warn!(mode = mode.key(), minutes, "stored duration out of range, using default");
                *self.slot_mut(mode) = defaults.minutes(mode);
            }
        }
        self
    }

    fn slot_mut(&mut self, mode: Mode) -> &mut u32 {
        match mode {
            Mode::Pomodoro => &mut self.pomodoro,
            Mode::ShortBreak => &mut self.short_break,
            Mode::LongBreak => &mut self.long_break,
        }
    }
}

/// Mode that follows a completed countdown.
///
/// `session_count` is the count after the completed pomodoro was credited.
pub fn next_mode(completed: Mode, session_count: u32, long_break_interval: u32) -> Mode {
    match completed {
        Mode::Pomodoro => {
            let interval = long_break_interval.max(1);
            if session_count % interval == 0 {
                Mode::LongBreak
            } else {
                Mode::ShortBreak
            }
        }
        Mode::ShortBreak | Mode::LongBreak => Mode::Pomodoro,
    }
}
