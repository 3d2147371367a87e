//! Tasks and projects.
//!
//! [`TaskBoard`] holds both ordered collections. It is the time attribution
//! ledger ([`TimeLedger`]) and the task progress tracker
//! ([`ProgressTracker`]) the session engine reports to.
//!
//! Tasks reference projects weakly: deleting a project leaves its tasks in
//! place, and a reference that no longer resolves is treated as "no
//! project" everywhere.

mod ids;
mod ledger;
mod progress;
mod project;
mod task;

pub use ids::{ProjectId, TaskId};
pub use ledger::TimeLedger;
pub use progress::{ProgressTracker, TaskProgress};
pub use project::{Project, DEFAULT_PROJECT_COLOR};
pub use task::{NewTask, Task, MAX_TASK_POMODOROS};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ValidationError;

/// The task and project credited while a pomodoro runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTarget {
    pub task_id: Option<TaskId>,
    pub project_id: Option<ProjectId>,
}

impl ActiveTarget {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.task_id.is_none() && self.project_id.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    next_task_id: u64,
    next_project_id: u64,
}

impl TaskBoard {
    /// Build a board from loaded records. Id counters continue after the
    /// highest id present.
    pub fn from_parts(tasks: Vec<Task>, projects: Vec<Project>) -> Self {
        let next_task_id = tasks.iter().map(|t| t.id.0).max().map_or(1, |m| m + 1);
        let next_project_id = projects.iter().map(|p| p.id.0).max().map_or(1, |m| m + 1);
        Self {
            tasks,
            projects,
            next_task_id,
            next_project_id,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Resolve a weak reference, dropping it if the project is gone.
    pub fn resolve_project(&self, id: Option<ProjectId>) -> Option<ProjectId> {
        id.filter(|id| self.project(*id).is_some())
    }

    /// # Errors
    ///
    /// Rejects blank names, counts outside `1..=99` and unknown projects.
    pub fn add_task(&mut self, new: NewTask) -> Result<&Task, ValidationError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName { field: "Task name" });
        }
        if !(1..=MAX_TASK_POMODOROS).contains(&new.total_pomodoros) {
            return Err(ValidationError::PomodoroCountOutOfRange(new.total_pomodoros));
        }
        if let Some(pid) = new.project_id {
            if self.project(pid).is_none() {
                return Err(ValidationError::UnknownProject(pid));
            }
        }

        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        info!(task = %id, name, "task added");
        self.tasks.push(Task {
            id,
            name: name.to_string(),
            total_pomodoros: new.total_pomodoros,
            completed_pomodoros: 0,
            completed: false,
            project_id: new.project_id,
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// # Errors
    ///
    /// Rejects blank names.
    pub fn add_project(
        &mut self,
        name: &str,
        color: Option<&str>,
    ) -> Result<&Project, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName { field: "Project name" });
        }
        let id = ProjectId(self.next_project_id);
        self.next_project_id += 1;
        info!(project = %id, name, "project added");
        self.projects.push(Project {
            id,
            name: name.to_string(),
            color: color
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_PROJECT_COLOR)
                .to_string(),
            accumulated_time: 0,
        });
        Ok(&self.projects[self.projects.len() - 1])
    }

    /// Remove a project. Its tasks are kept with a now-dangling reference.
    pub fn delete_project(&mut self, id: ProjectId) -> Option<Project> {
        let idx = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(idx))
    }

    /// Zero a project's accumulated time. Returns `false` if it doesn't exist.
    pub fn reset_project_time(&mut self, id: ProjectId) -> bool {
        match self.project_mut(id) {
            Some(project) => {
                project.accumulated_time = 0;
                true
            }
            None => false,
        }
    }

    pub fn project_task_count(&self, id: ProjectId) -> usize {
        self.tasks.iter().filter(|t| t.belongs_to(id)).count()
    }

    /// Tasks visible under a project filter; `None` shows everything.
    pub fn tasks_in(&self, filter: Option<ProjectId>) -> Vec<&Task> {
        match filter {
            None => self.tasks.iter().collect(),
            Some(pid) if self.project(pid).is_none() => Vec::new(),
            Some(pid) => self.tasks.iter().filter(|t| t.belongs_to(pid)).collect(),
        }
    }

    /// Choose what a starting pomodoro is credited to.
    ///
    /// With a filter, the first incomplete task of that project wins, falling
    /// back to the project alone. Without one, the first incomplete task wins
    /// together with its project, if that still exists.
    pub fn select_active(&self, filter: Option<ProjectId>) -> ActiveTarget {
        match self.resolve_project(filter) {
            Some(pid) => {
                let task = self.tasks.iter().find(|t| t.belongs_to(pid) && !t.completed);
                ActiveTarget {
                    task_id: task.map(|t| t.id),
                    project_id: Some(pid),
                }
            }
            None => match self.tasks.iter().find(|t| !t.completed) {
                Some(task) => ActiveTarget {
                    task_id: Some(task.id),
                    project_id: self.resolve_project(task.project_id),
                },
                None => ActiveTarget::none(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_two_projects() -> (TaskBoard, ProjectId, ProjectId) {
        let mut board = TaskBoard::default();
        let a = board.add_project("Alpha", None).unwrap().id;
        let b = board.add_project("Beta", Some("#123456")).unwrap().id;
        (board, a, b)
    }

    #[test]
    fn ids_continue_after_loaded_records() {
        let tasks = vec![Task {
            id: TaskId(7),
            name: "old".into(),
            total_pomodoros: 1,
            completed_pomodoros: 0,
            completed: false,
            project_id: None,
        }];
        let mut board = TaskBoard::from_parts(tasks, Vec::new());
        assert_eq!(board.add_task(NewTask::new("new", 1)).unwrap().id, TaskId(8));
        assert_eq!(board.add_project("p", None).unwrap().id, ProjectId(1));
    }

    #[test]
    fn add_task_validates_input() {
        let (mut board, a, _) = board_with_two_projects();
        assert_eq!(
            board.add_task(NewTask::new("   ", 1)).unwrap_err(),
            ValidationError::EmptyName { field: "Task name" }
        );
        assert!(board.add_task(NewTask::new("x", 0)).is_err());
        assert!(board.add_task(NewTask::new("x", 100)).is_err());
        assert_eq!(
            board.add_task(NewTask::new("x", 1).in_project(ProjectId(99))).unwrap_err(),
            ValidationError::UnknownProject(ProjectId(99))
        );
        let task = board.add_task(NewTask::new("  Write  ", 99).in_project(a)).unwrap();
        assert_eq!(task.name, "Write");
        assert_eq!(task.project_id, Some(a));
    }

    #[test]
    fn project_color_defaults() {
        let (board, a, b) = board_with_two_projects();
        assert_eq!(board.project(a).unwrap().color, DEFAULT_PROJECT_COLOR);
        assert_eq!(board.project(b).unwrap().color, "#123456");
    }

    #[test]
    fn deleting_project_keeps_tasks_but_hides_them_from_its_filter() {
        let (mut board, a, _) = board_with_two_projects();
        let tid = board.add_task(NewTask::new("t", 2).in_project(a)).unwrap().id;
        assert_eq!(board.tasks_in(Some(a)).len(), 1);

        board.delete_project(a).unwrap();

        let task = board.task(tid).unwrap();
        assert_eq!(task.project_id, Some(a));
        assert_eq!(board.tasks_in(None).len(), 1);
        assert!(board.tasks_in(Some(a)).is_empty());
        assert_eq!(board.resolve_project(task.project_id), None);
    }

    #[test]
    fn select_with_filter_prefers_first_incomplete_project_task() {
        let (mut board, a, b) = board_with_two_projects();
        board.add_task(NewTask::new("other", 1).in_project(b)).unwrap();
        let first = board.add_task(NewTask::new("a1", 1).in_project(a)).unwrap().id;
        let second = board.add_task(NewTask::new("a2", 1).in_project(a)).unwrap().id;
        board.task_mut(first).unwrap().completed = true;

        let target = board.select_active(Some(a));
        assert_eq!(target.task_id, Some(second));
        assert_eq!(target.project_id, Some(a));
    }

    #[test]
    fn select_with_filter_falls_back_to_project_alone() {
        let (mut board, a, _) = board_with_two_projects();
        board.add_task(NewTask::new("loose", 1)).unwrap();
        let target = board.select_active(Some(a));
        assert_eq!(target, ActiveTarget { task_id: None, project_id: Some(a) });
    }

    #[test]
    fn select_without_filter_takes_first_incomplete_task() {
        let (mut board, a, _) = board_with_two_projects();
        let done = board.add_task(NewTask::new("done", 1)).unwrap().id;
        board.task_mut(done).unwrap().completed = true;
        let next = board.add_task(NewTask::new("next", 1).in_project(a)).unwrap().id;

        let target = board.select_active(None);
        assert_eq!(target.task_id, Some(next));
        assert_eq!(target.project_id, Some(a));
    }

    #[test]
    fn select_without_tasks_targets_nothing() {
        let (board, _, _) = board_with_two_projects();
        assert!(board.select_active(None).is_none());
    }

    #[test]
    fn select_drops_dangling_project_of_task() {
        let (mut board, a, _) = board_with_two_projects();
        let tid = board.add_task(NewTask::new("t", 1).in_project(a)).unwrap().id;
        board.delete_project(a);
        let target = board.select_active(None);
        assert_eq!(target.task_id, Some(tid));
        assert_eq!(target.project_id, None);
    }

    #[test]
    fn reset_project_time_zeroes_counter() {
        let (mut board, a, _) = board_with_two_projects();
        board.project_mut(a).unwrap().accumulated_time = 900;
        assert!(board.reset_project_time(a));
        assert_eq!(board.project(a).unwrap().accumulated_time, 0);
        assert!(!board.reset_project_time(ProjectId(42)));
    }
}
