use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{ProjectId, TaskId};
use crate::timer::{Mode, Settings, TimerState};

/// Every state change in the session engine produces an Event.
///
/// The application context applies the side-effecting ones (accrual,
/// progress, settings) before handing the list to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        deadline_ms: u64,
        task_id: Option<TaskId>,
        project_id: Option<ProjectId>,
        at: DateTime<Utc>,
    },
    /// Remaining time changed while running.
    TimerTicked {
        remaining_secs: u64,
    },
    /// Whole seconds credited to the active project.
    TimeAccrued {
        project_id: ProjectId,
        seconds: u64,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A running countdown was abandoned by a mode switch (no credit).
    TimerStopped {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        mode: Mode,
        session_count: u32,
        at: DateTime<Utc>,
    },
    /// A pomodoro ran to zero; credit goes to the task active at expiry.
    PomodoroCompleted {
        task_id: Option<TaskId>,
        project_id: Option<ProjectId>,
        session_count: u32,
    },
    ModeSwitched {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    EditStarted {
        display: String,
    },
    EditChanged {
        digits: String,
        display: String,
    },
    EditCommitted {
        mode: Mode,
        total_secs: u64,
        minutes: u32,
    },
    EditCancelled {
        remaining_secs: u64,
    },
    EditRejected {
        reason: String,
    },
    SettingsChanged {
        settings: Settings,
    },
    StateSnapshot {
        state: TimerState,
        mode: Mode,
        remaining_secs: u64,
        display: String,
        session_count: u32,
        task_id: Option<TaskId>,
        project_id: Option<ProjectId>,
        settings: Settings,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerTicked { .. } => "TimerTicked",
            Event::TimeAccrued { .. } => "TimeAccrued",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerStopped { .. } => "TimerStopped",
            Event::TimerCompleted { .. } => "TimerCompleted",
            Event::PomodoroCompleted { .. } => "PomodoroCompleted",
            Event::ModeSwitched { .. } => "ModeSwitched",
            Event::EditStarted { .. } => "EditStarted",
            Event::EditChanged { .. } => "EditChanged",
            Event::EditCommitted { .. } => "EditCommitted",
            Event::EditCancelled { .. } => "EditCancelled",
            Event::EditRejected { .. } => "EditRejected",
            Event::SettingsChanged { .. } => "SettingsChanged",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}

/// Convert a clock reading into an event timestamp.
pub(crate) fn timestamp(now_ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_ms as i64).unwrap_or_default()
}
