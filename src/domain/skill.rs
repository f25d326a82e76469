//! Skills — the learnable units forming the quest map DAG.

use serde::{Deserialize, Serialize};

/// Unlock lifecycle state of a skill.
///
/// The only legal transitions are `Locked -> Learning -> Mastered`;
/// `Mastered` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkillStatus {
    Locked,
    Learning,
    Mastered,
}

/// One learnable unit with its position in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Stable unique identifier, used as the graph node key.
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: SkillStatus,
    /// Ids of skills that must be mastered before this one can start.
    /// Persisted documents may omit the field entirely; treat as empty.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Skill {
    /// A root skill has no dependencies and may start in `Learning`.
    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }
}
