//! Session engine implementation.
//!
//! The engine is a deadline-based state machine. It does not own a clock or
//! a thread: every command receives the current wall-clock reading and the
//! caller is responsible for calling `tick()` periodically while running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Idle          (pause, expiry, mode switch)
//! Idle -> Editing -> Idle          (commit, cancel, reject)
//! ```
//!
//! Remaining time is always recomputed as `ceil((deadline - now) / 1000)`,
//! so late or missed ticks never skew the countdown.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(Settings::default());
//! engine.start(clock.now_ms(), target);
//! // In a loop:
//! for event in engine.tick(clock.now_ms()) { /* apply */ }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::display::format_clock;
use super::edit::{minutes_for, EditKey, TimeEdit};
use super::mode::{next_mode, Mode, Settings, DEFAULT_LONG_BREAK_INTERVAL};
use crate::board::ActiveTarget;
use crate::error::ValidationError;
use crate::events::{timestamp, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    /// Time entry in progress; only reachable from `Idle`.
    Editing,
}

/// Bookkeeping for a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Countdown {
    deadline_ms: u64,
    /// Everything before this instant has already been offered to the ledger.
    checkpoint_ms: u64,
    target: ActiveTarget,
}

impl Countdown {
    /// Whole seconds not yet accrued, counting no further than the deadline.
    fn pending_secs(&self, now_ms: u64) -> u64 {
        now_ms
            .min(self.deadline_ms)
            .saturating_sub(self.checkpoint_ms)
            / 1000
    }

    /// Consume pending whole seconds, returning the accrual event if a
    /// project is attached. The checkpoint advances either way.
    fn take_accrual(&mut self, now_ms: u64) -> Option<Event> {
        let secs = self.pending_secs(now_ms);
        if secs == 0 {
            return None;
        }
        self.checkpoint_ms += secs * 1000;
        self.target.project_id.map(|project_id| Event::TimeAccrued {
            project_id,
            seconds: secs,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEngine {
    settings: Settings,
    long_break_interval: u32,
    mode: Mode,
    remaining_secs: u64,
    session_count: u32,
    countdown: Option<Countdown>,
    edit: Option<TimeEdit>,
}

impl SessionEngine {
    /// A fresh session: pomodoro mode, full duration, session #1.
    pub fn new(settings: Settings) -> Self {
        Self {
            remaining_secs: settings.duration_secs(Mode::Pomodoro),
            settings,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
            mode: Mode::Pomodoro,
            session_count: 1,
            countdown: None,
            edit: None,
        }
    }

    pub fn with_long_break_interval(mut self, interval: u32) -> Self {
        self.long_break_interval = interval.max(1);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.countdown.is_some() {
            TimerState::Running
        } else if self.edit.is_some() {
            TimerState::Editing
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.countdown.map(|c| c.deadline_ms)
    }

    /// Task/project being credited; empty unless running.
    pub fn active_target(&self) -> ActiveTarget {
        self.countdown.map(|c| c.target).unwrap_or_default()
    }

    pub fn edit(&self) -> Option<&TimeEdit> {
        self.edit.as_ref()
    }

    /// What the timer face shows right now.
    pub fn display(&self) -> String {
        match &self.edit {
            Some(edit) => edit.display(),
            None => format_clock(self.remaining_secs),
        }
    }

    pub fn snapshot(&self, now_ms: u64) -> Event {
        let target = self.active_target();
        Event::StateSnapshot {
            state: self.state(),
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            display: self.display(),
            session_count: self.session_count,
            task_id: target.task_id,
            project_id: target.project_id,
            settings: self.settings,
            at: timestamp(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down from the current remaining time.
    ///
    /// `target` is only honoured in pomodoro mode. A pending edit is
    /// committed first. Starting while already running does nothing.
    pub fn start(&mut self, now_ms: u64, target: ActiveTarget) -> Vec<Event> {
        let mut events = Vec::new();
        if self.countdown.is_some() {
            return events;
        }
        if self.edit.is_some() {
            self.finish_edit_into(&mut events);
        }

        let target = if self.mode == Mode::Pomodoro {
            target
        } else {
            ActiveTarget::none()
        };
        let deadline_ms = now_ms + self.remaining_secs * 1000;
        self.countdown = Some(Countdown {
            deadline_ms,
            checkpoint_ms: now_ms,
            target,
        });
        info!(
            mode = self.mode.key(),
            remaining_secs = self.remaining_secs,
            task = ?target.task_id,
            project = ?target.project_id,
            "timer started"
        );
        events.push(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            deadline_ms,
            task_id: target.task_id,
            project_id: target.project_id,
            at: timestamp(now_ms),
        });
        events
    }

    /// Stop counting, keeping the remaining time. Unaccrued whole seconds
    /// are flushed before the active target is dropped.
    ///
    /// A pause at or past the deadline is an expiry: the countdown completes
    /// and the next mode is entered instead.
    pub fn pause(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(deadline_ms) = self.deadline_ms() else {
            return events;
        };
        if remaining_at(deadline_ms, now_ms) == 0 {
            self.remaining_secs = 0;
            self.expire(now_ms, &mut events);
            return events;
        }
        let Some(mut countdown) = self.countdown.take() else {
            return events;
        };
        self.remaining_secs = remaining_at(countdown.deadline_ms, now_ms);
        events.extend(countdown.take_accrual(now_ms));
        info!(remaining_secs = self.remaining_secs, "timer paused");
        events.push(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: timestamp(now_ms),
        });
        events
    }

    /// Recompute remaining time from the deadline and accrue elapsed whole
    /// seconds. Handles expiry. A tick while not running is ignored.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(countdown) = self.countdown.as_mut() else {
            return events;
        };

        let remaining = remaining_at(countdown.deadline_ms, now_ms);
        events.extend(countdown.take_accrual(now_ms));

        if remaining != self.remaining_secs {
            self.remaining_secs = remaining;
            debug!(remaining_secs = remaining, "tick");
            events.push(Event::TimerTicked {
                remaining_secs: remaining,
            });
        }
        if remaining == 0 {
            self.expire(now_ms, &mut events);
        }
        events
    }

    /// Change mode, abandoning any running countdown without completion
    /// credit. A pending edit is committed first. A countdown already past
    /// its deadline completes before the switch.
    pub fn switch_mode(&mut self, mode: Mode, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.edit.is_some() {
            self.finish_edit_into(&mut events);
        }
        if self.deadline_ms().is_some_and(|d| remaining_at(d, now_ms) == 0) {
            self.expire(now_ms, &mut events);
        }
        if let Some(mut countdown) = self.countdown.take() {
            self.remaining_secs = remaining_at(countdown.deadline_ms, now_ms);
            events.extend(countdown.take_accrual(now_ms));
            info!(mode = self.mode.key(), remaining_secs = self.remaining_secs, "timer stopped");
            events.push(Event::TimerStopped {
                mode: self.mode,
                remaining_secs: self.remaining_secs,
                at: timestamp(now_ms),
            });
        }
        self.enter_mode(mode, now_ms, &mut events);
        events
    }

    /// Open the time editor. Ignored while running or already editing.
    pub fn begin_edit(&mut self) -> Vec<Event> {
        if self.countdown.is_some() || self.edit.is_some() {
            return Vec::new();
        }
        let edit = TimeEdit::new(self.remaining_secs);
        let display = edit.display();
        self.edit = Some(edit);
        vec![Event::EditStarted { display }]
    }

    /// Feed one key to the editor. Ignored unless editing.
    ///
    /// # Errors
    ///
    /// `Enter` on an invalid entry returns the [`ValidationError`]; the edit
    /// has already been discarded and the prior time restored.
    pub fn edit_key(&mut self, key: EditKey) -> Result<Vec<Event>, ValidationError> {
        let Some(edit) = self.edit.as_mut() else {
            return Ok(Vec::new());
        };
        match key {
            EditKey::Digit(d) => {
                if !edit.push_digit(d) {
                    return Ok(Vec::new());
                }
                Ok(vec![edit_changed(edit)])
            }
            EditKey::Backspace | EditKey::Delete => {
                edit.pop_digit();
                Ok(vec![edit_changed(edit)])
            }
            EditKey::Enter => self.finish_edit(),
            EditKey::Escape | EditKey::Blur => Ok(self.cancel_edit()),
        }
    }

    /// Confirm the edit.
    ///
    /// A valid entry becomes the remaining time (exact seconds) and the mode
    /// setting (rounded up to whole minutes). An empty or zero entry cancels.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for out-of-range fields or durations
    /// over three hours. Editing has ended either way.
    pub fn finish_edit(&mut self) -> Result<Vec<Event>, ValidationError> {
        let Some(edit) = self.edit.take() else {
            return Ok(Vec::new());
        };
        let Some(total_secs) = edit.resolve()? else {
            return Ok(vec![Event::EditCancelled {
                remaining_secs: self.remaining_secs,
            }]);
        };

        let minutes = minutes_for(total_secs);
        self.settings.set_minutes(self.mode, minutes)?;
        self.remaining_secs = total_secs;
        info!(mode = self.mode.key(), total_secs, minutes, "duration edited");
        Ok(vec![
            Event::EditCommitted {
                mode: self.mode,
                total_secs,
                minutes,
            },
            Event::SettingsChanged {
                settings: self.settings,
            },
        ])
    }

    /// Discard the edit and keep the prior time.
    pub fn cancel_edit(&mut self) -> Vec<Event> {
        match self.edit.take() {
            Some(_) => vec![Event::EditCancelled {
                remaining_secs: self.remaining_secs,
            }],
            None => Vec::new(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Countdown reached zero. The active target is captured before the
    /// countdown is cleared so the completion credit reaches it.
    fn expire(&mut self, now_ms: u64, events: &mut Vec<Event>) {
        let Some(mut countdown) = self.countdown.take() else {
            return;
        };
        let completed = self.mode;
        let target = countdown.target;
        events.extend(countdown.take_accrual(now_ms));

        if completed == Mode::Pomodoro {
            self.session_count += 1;
            events.push(Event::PomodoroCompleted {
                task_id: target.task_id,
                project_id: target.project_id,
                session_count: self.session_count,
            });
        }
        info!(mode = completed.key(), session_count = self.session_count, "timer completed");
        events.push(Event::TimerCompleted {
            mode: completed,
            session_count: self.session_count,
            at: timestamp(now_ms),
        });

        let next = next_mode(completed, self.session_count, self.long_break_interval);
        self.enter_mode(next, now_ms, events);
    }

    fn enter_mode(&mut self, mode: Mode, now_ms: u64, events: &mut Vec<Event>) {
        self.mode = mode;
        self.remaining_secs = self.settings.duration_secs(mode);
        events.push(Event::ModeSwitched {
            mode,
            remaining_secs: self.remaining_secs,
            at: timestamp(now_ms),
        });
    }

    fn finish_edit_into(&mut self, events: &mut Vec<Event>) {
        match self.finish_edit() {
            Ok(committed) => events.extend(committed),
            Err(err) => {
                warn!(error = %err, "pending edit rejected");
                events.push(Event::EditRejected {
                    reason: err.to_string(),
                });
            }
        }
    }
}

fn remaining_at(deadline_ms: u64, now_ms: u64) -> u64 {
    deadline_ms.saturating_sub(now_ms).div_ceil(1000)
}

fn edit_changed(edit: &TimeEdit) -> Event {
    Event::EditChanged {
        digits: edit.digits().to_string(),
        display: edit.display(),
    }
}
