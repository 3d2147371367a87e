use serde::{Deserialize, Serialize};

use super::ids::ProjectId;

pub const DEFAULT_PROJECT_COLOR: &str = "#4CAF50";

/// A group of tasks that collects focus time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Display attribute only.
    #[serde(default = "default_color")]
    pub color: String,
    /// Seconds of pomodoro time attributed to this project.
    #[serde(default)]
    pub accumulated_time: u64,
}

fn default_color() -> String {
    DEFAULT_PROJECT_COLOR.to_string()
}
