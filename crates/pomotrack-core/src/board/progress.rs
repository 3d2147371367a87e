use serde::{Deserialize, Serialize};
use tracing::info;

use super::{TaskBoard, TaskId};

/// Counters of a task after a progress change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub task_id: TaskId,
    pub completed_pomodoros: u32,
    pub total_pomodoros: u32,
    pub completed: bool,
}

pub trait ProgressTracker {
    /// Credit one finished pomodoro to a task.
    ///
    /// No-op (returns `None`) without a task, for an unknown task, or for a
    /// task that is already completed.
    fn complete_pomodoro(&mut self, task: Option<TaskId>) -> Option<TaskProgress>;

    /// Flip the completed flag, leaving the counters alone.
    fn toggle_complete(&mut self, task: TaskId) -> Option<TaskProgress>;
}

impl ProgressTracker for TaskBoard {
    fn complete_pomodoro(&mut self, task: Option<TaskId>) -> Option<TaskProgress> {
        let task = self.task_mut(task?)?;
        if task.completed {
            return None;
        }
        task.completed_pomodoros = task.completed_pomodoros.saturating_add(1);
        if task.completed_pomodoros >= task.total_pomodoros {
            task.completed = true;
            info!(task = %task.id, "task completed");
        }
        Some(progress_of(task))
    }

    fn toggle_complete(&mut self, task: TaskId) -> Option<TaskProgress> {
        let task = self.task_mut(task)?;
        task.completed = !task.completed;
        Some(progress_of(task))
    }
}

fn progress_of(task: &super::Task) -> TaskProgress {
    TaskProgress {
        task_id: task.id,
        completed_pomodoros: task.completed_pomodoros,
        total_pomodoros: task.total_pomodoros,
        completed: task.completed,
    }
}
