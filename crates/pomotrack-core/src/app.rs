//! Application context.
//!
//! [`App`] owns everything a running timer needs: the session engine, the
//! task board, the current project filter, the persistent store, the clock
//! and the completion cues. Every command reads the clock once, drives the
//! engine, and applies the resulting events before returning them, so by
//! the time a pause or mode switch returns its accrued seconds are already
//! credited and persisted.

use tracing::{debug, info};

use crate::board::{
    NewTask, Project, ProjectId, ProgressTracker, Task, TaskBoard, TaskId, TaskProgress,
    TimeLedger,
};
use crate::clock::Clock;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::notify::{completion_message, AudioCue, Notifier, Silent, Tone};
use crate::storage::{load_json, save_json, Store, PROJECTS_KEY, SETTINGS_KEY, TASKS_KEY};
use crate::timer::{EditKey, Mode, SessionEngine, Settings, TimerState};

pub struct App<S: Store, C: Clock> {
    store: S,
    clock: C,
    notifier: Box<dyn Notifier>,
    cue: Box<dyn AudioCue>,
    engine: SessionEngine,
    board: TaskBoard,
    /// Project whose tasks are in view; `None` shows all tasks.
    filter: Option<ProjectId>,
}

impl<S: Store, C: Clock> App<S, C> {
    /// Load settings, tasks and projects from `store`.
    ///
    /// Missing or malformed records fall back to defaults.
    pub fn load(store: S, clock: C) -> Self {
        let settings = load_json::<Settings>(&store, SETTINGS_KEY)
            .unwrap_or_default()
            .sanitized();
        let tasks: Vec<Task> = load_json(&store, TASKS_KEY).unwrap_or_default();
        let projects: Vec<Project> = load_json(&store, PROJECTS_KEY).unwrap_or_default();
        debug!(tasks = tasks.len(), projects = projects.len(), "board loaded");

        Self {
            store,
            clock,
            notifier: Box::new(Silent),
            cue: Box::new(Silent),
            engine: SessionEngine::new(settings),
            board: TaskBoard::from_parts(tasks, projects),
            filter: None,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_audio_cue(mut self, cue: impl AudioCue + 'static) -> Self {
        self.cue = Box::new(cue);
        self
    }

    /// Pomodoros per long break. Only takes effect before the first expiry
    /// of this session.
    pub fn with_long_break_interval(mut self, interval: u32) -> Self {
        self.engine = self.engine.with_long_break_interval(interval);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn project_filter(&self) -> Option<ProjectId> {
        self.filter
    }

    /// Tasks under the current project filter.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.board.tasks_in(self.filter)
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(self.clock.now_ms())
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Start the countdown, choosing the credited task/project in pomodoro
    /// mode.
    ///
    /// # Errors
    /// Returns an error if a resulting record cannot be persisted.
    pub fn start(&mut self) -> Result<Vec<Event>> {
        if self.engine.is_running() {
            return Ok(Vec::new());
        }
        let target = if self.engine.mode() == Mode::Pomodoro {
            self.board.select_active(self.filter)
        } else {
            Default::default()
        };
        let now = self.clock.now_ms();
        let events = self.engine.start(now, target);
        self.apply(events)
    }

    /// # Errors
    /// Returns an error if flushed time cannot be persisted.
    pub fn pause(&mut self) -> Result<Vec<Event>> {
        let now = self.clock.now_ms();
        let events = self.engine.pause(now);
        self.apply(events)
    }

    /// The start/pause button.
    ///
    /// # Errors
    /// See [`App::start`] and [`App::pause`].
    pub fn toggle(&mut self) -> Result<Vec<Event>> {
        if self.engine.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Poll the running countdown. Safe to call at any time.
    ///
    /// # Errors
    /// Returns an error if accrued time or task progress cannot be persisted.
    pub fn tick(&mut self) -> Result<Vec<Event>> {
        let now = self.clock.now_ms();
        let events = self.engine.tick(now);
        self.apply(events)
    }

    /// # Errors
    /// Returns an error if flushed time or a committed edit cannot be
    /// persisted.
    pub fn switch_mode(&mut self, mode: Mode) -> Result<Vec<Event>> {
        let now = self.clock.now_ms();
        let events = self.engine.switch_mode(mode, now);
        self.apply(events)
    }

    pub fn begin_edit(&mut self) -> Vec<Event> {
        self.engine.begin_edit()
    }

    /// # Errors
    /// A rejected entry surfaces as [`CoreError::Validation`](crate::CoreError::Validation)
    /// after the edit has been reverted.
    pub fn edit_key(&mut self, key: EditKey) -> Result<Vec<Event>> {
        let events = self.engine.edit_key(key)?;
        self.apply(events)
    }

    // ── Board commands ───────────────────────────────────────────────

    /// Show only `project`'s tasks (`None` for all). Takes effect for
    /// attribution at the next start.
    ///
    /// # Errors
    /// Rejects an unknown project.
    pub fn select_project(&mut self, project: Option<ProjectId>) -> Result<()> {
        if let Some(pid) = project {
            if self.board.project(pid).is_none() {
                return Err(ValidationError::UnknownProject(pid).into());
            }
        }
        self.filter = project;
        Ok(())
    }

    /// Add a task. While a project is selected, the task joins it unless
    /// another project is named.
    ///
    /// # Errors
    /// Returns validation or persistence errors.
    pub fn add_task(&mut self, mut new: NewTask) -> Result<Task> {
        if new.project_id.is_none() {
            new.project_id = self.filter;
        }
        let task = self.board.add_task(new)?.clone();
        self.persist_tasks()?;
        Ok(task)
    }

    /// # Errors
    /// Returns an error for an unknown task or a failed write.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task> {
        let task = self
            .board
            .delete_task(id)
            .ok_or(ValidationError::UnknownTask(id))?;
        self.persist_tasks()?;
        Ok(task)
    }

    /// # Errors
    /// Returns an error for an unknown task or a failed write.
    pub fn toggle_task(&mut self, id: TaskId) -> Result<TaskProgress> {
        let progress = self
            .board
            .toggle_complete(id)
            .ok_or(ValidationError::UnknownTask(id))?;
        self.persist_tasks()?;
        Ok(progress)
    }

    /// # Errors
    /// Returns validation or persistence errors.
    pub fn add_project(&mut self, name: &str, color: Option<&str>) -> Result<Project> {
        let project = self.board.add_project(name, color)?.clone();
        self.persist_projects()?;
        Ok(project)
    }

    /// Delete a project; its tasks stay. Clears the filter if it pointed
    /// at the deleted project.
    ///
    /// # Errors
    /// Returns an error for an unknown project or a failed write.
    pub fn delete_project(&mut self, id: ProjectId) -> Result<Project> {
        let project = self
            .board
            .delete_project(id)
            .ok_or(ValidationError::UnknownProject(id))?;
        if self.filter == Some(id) {
            self.filter = None;
        }
        self.persist_projects()?;
        Ok(project)
    }

    /// # Errors
    /// Returns an error for an unknown project or a failed write.
    pub fn reset_project_time(&mut self, id: ProjectId) -> Result<()> {
        if !self.board.reset_project_time(id) {
            return Err(ValidationError::UnknownProject(id).into());
        }
        self.persist_projects()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, events: Vec<Event>) -> Result<Vec<Event>> {
        for event in &events {
            match event {
                Event::TimeAccrued { project_id, seconds } => {
                    if self.board.accrue(*project_id, *seconds) {
                        self.persist_projects()?;
                    }
                }
                Event::PomodoroCompleted { task_id, .. } => {
                    if let Some(progress) = self.board.complete_pomodoro(*task_id) {
                        info!(
                            task = %progress.task_id,
                            done = progress.completed_pomodoros,
                            total = progress.total_pomodoros,
                            "task progress"
                        );
                        self.persist_tasks()?;
                    }
                }
                Event::SettingsChanged { settings } => {
                    save_json(&mut self.store, SETTINGS_KEY, settings)?;
                }
                Event::TimerCompleted { mode, .. } => self.announce(*mode),
                _ => {}
            }
        }
        Ok(events)
    }

    fn announce(&self, completed: Mode) {
        self.cue.play(&Tone::completion());
        let (title, body) = completion_message(completed);
        if let Err(e) = self.notifier.notify(title, body) {
            debug!(error = %e, "notification dropped");
        }
    }

    fn persist_tasks(&mut self) -> Result<()> {
        save_json(&mut self.store, TASKS_KEY, self.board.tasks())
    }

    fn persist_projects(&mut self) -> Result<()> {
        save_json(&mut self.store, PROJECTS_KEY, self.board.projects())
    }
}
