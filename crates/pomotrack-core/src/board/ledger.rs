use tracing::debug;

use super::{ProjectId, TaskBoard};

/// Receives focus seconds while a pomodoro runs.
pub trait TimeLedger {
    /// Add `seconds` to a project's accumulated time.
    ///
    /// Returns `false` when nothing was credited (unknown project or zero
    /// seconds).
    fn accrue(&mut self, project: ProjectId, seconds: u64) -> bool;
}

impl TimeLedger for TaskBoard {
    fn accrue(&mut self, project: ProjectId, seconds: u64) -> bool {
        if seconds == 0 {
            return false;
        }
        match self.project_mut(project) {
            Some(p) => {
                p.accumulated_time = p.accumulated_time.saturating_add(seconds);
                debug!(project = %project, seconds, total = p.accumulated_time, "time accrued");
                true
            }
            None => false,
        }
    }
}
