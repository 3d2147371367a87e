use serde::{Deserialize, Serialize};

use super::ids::{ProjectId, TaskId};

pub const MAX_TASK_POMODOROS: u32 = 99;

/// A unit of work measured in pomodoros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub total_pomodoros: u32,
    #[serde(default)]
    pub completed_pomodoros: u32,
    #[serde(default)]
    pub completed: bool,
    /// Weak reference; may point at a deleted project.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

impl Task {
    pub fn belongs_to(&self, project: ProjectId) -> bool {
        self.project_id == Some(project)
    }

    /// `"2 / 4 pomodoros"`.
    pub fn progress_label(&self) -> String {
        format!("{} / {} pomodoros", self.completed_pomodoros, self.total_pomodoros)
    }
}

/// Input for [`TaskBoard::add_task`](super::TaskBoard::add_task).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub total_pomodoros: u32,
    pub project_id: Option<ProjectId>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, total_pomodoros: u32) -> Self {
        Self {
            name: name.into(),
            total_pomodoros,
            project_id: None,
        }
    }

    pub fn in_project(mut self, project: ProjectId) -> Self {
        self.project_id = Some(project);
        self
    }
}
