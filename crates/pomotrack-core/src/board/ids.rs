use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

/// Project identity.
///
/// Serialized as a plain integer. Older data stored ids as `"project-N"`
/// strings; both forms are accepted on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

impl FromStr for ProjectId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.strip_prefix("project-").unwrap_or(s).parse().map(ProjectId)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProjectId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawProjectId::deserialize(deserializer)? {
            RawProjectId::Number(n) => Ok(ProjectId(n)),
            RawProjectId::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_accepts_legacy_strings() {
        let id: ProjectId = serde_json::from_str(r#""project-7""#).unwrap();
        assert_eq!(id, ProjectId(7));
        let id: ProjectId = serde_json::from_str("3").unwrap();
        assert_eq!(id, ProjectId(3));
        assert!(serde_json::from_str::<ProjectId>(r#""nope""#).is_err());
    }

    #[test]
    fn project_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ProjectId(12)).unwrap(), "12");
    }

    #[test]
    fn ids_parse_from_cli_arguments() {
        assert_eq!("project-2".parse::<ProjectId>().unwrap(), ProjectId(2));
        assert_eq!(" 9 ".parse::<TaskId>().unwrap(), TaskId(9));
    }
}
