//! Project management commands for CLI.

use clap::Subcommand;
use pomotrack_core::timer::format_accumulated;
use pomotrack_core::{Config, ProjectId};

use crate::common::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Add {
        /// Project name
        name: String,
        /// Display color, e.g. "#2196F3"
        #[arg(long)]
        color: Option<String>,
    },
    /// List all projects with their focus time
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a project; its tasks are kept
    Delete { id: ProjectId },
    /// Zero a project's accumulated time
    ResetTime { id: ProjectId },
}

pub fn run(action: ProjectAction) -> CliResult {
    let config = Config::load()?;
    let mut app = open_app(&config)?;

    match action {
        ProjectAction::Add { name, color } => {
            let project = app.add_project(&name, color.as_deref())?;
            println!("Project created: {}", project.id);
            print_json(&project)?;
        }
        ProjectAction::List { json } => {
            let board = app.board();
            if json {
                print_json(board.projects())?;
                return Ok(());
            }
            if board.projects().is_empty() {
                println!("No projects.");
            }
            for project in board.projects() {
                println!(
                    "{:>4}  {}  {}  {} tasks  {}",
                    project.id.0,
                    project.name,
                    format_accumulated(project.accumulated_time),
                    board.project_task_count(project.id),
                    project.color
                );
            }
        }
        ProjectAction::Delete { id } => {
            let project = app.delete_project(id)?;
            println!("Project deleted: {}", project.id);
        }
        ProjectAction::ResetTime { id } => {
            app.reset_project_time(id)?;
            println!("Project time reset: {id}");
        }
    }
    Ok(())
}
