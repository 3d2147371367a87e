//! Task management commands for CLI.

use clap::Subcommand;
use pomotrack_core::{Config, NewTask, ProjectId, TaskId};

use crate::common::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task name
        name: String,
        /// Estimated pomodoros (1-99)
        #[arg(long, default_value_t = 1)]
        pomodoros: u32,
        /// Project the task belongs to
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// List tasks
    List {
        /// Only tasks of this project
        #[arg(long)]
        project: Option<ProjectId>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a task's completed flag
    Toggle { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
}

pub fn run(action: TaskAction) -> CliResult {
    let config = Config::load()?;
    let mut app = open_app(&config)?;

    match action {
        TaskAction::Add {
            name,
            pomodoros,
            project,
        } => {
            let mut new = NewTask::new(name, pomodoros);
            if let Some(pid) = project {
                new = new.in_project(pid);
            }
            let task = app.add_task(new)?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { project, json } => {
            let board = app.board();
            let tasks = board.tasks_in(project);
            if json {
                print_json(&tasks)?;
                return Ok(());
            }
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                let project = board
                    .resolve_project(task.project_id)
                    .and_then(|pid| board.project(pid))
                    .map(|p| p.name.as_str())
                    .unwrap_or("-");
                println!(
                    "{:>4}  [{}]  {}  ({})  {}",
                    task.id.0,
                    if task.completed { "x" } else { " " },
                    task.name,
                    task.progress_label(),
                    project
                );
            }
        }
        TaskAction::Toggle { id } => {
            let progress = app.toggle_task(id)?;
            print_json(&progress)?;
        }
        TaskAction::Delete { id } => {
            let task = app.delete_task(id)?;
            println!("Task deleted: {}", task.id);
        }
    }
    Ok(())
}
