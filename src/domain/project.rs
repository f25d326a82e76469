//! Project Genesis artifacts — planning payloads produced by the content
//! backend. Carried in the user document; no graph behavior attaches to them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Skill-requirement analysis for a chosen project angle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBlueprint {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub skill_strengths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTask {
    pub task_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhase {
    pub phase_name: String,
    #[serde(default)]
    pub tasks: Vec<ProjectTask>,
}

/// A planned project: the idea, the chosen angle, its blueprint, and an
/// ordered roadmap of phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub idea: String,
    pub angle: String,
    /// Older documents may lack these fields; default to empty.
    #[serde(default)]
    pub blueprint: ProjectBlueprint,
    #[serde(default)]
    pub roadmap: Vec<ProjectPhase>,
}

impl Project {
    /// Assemble a project with a fresh unique id.
    pub fn new(
        idea: impl Into<String>,
        angle: impl Into<String>,
        blueprint: ProjectBlueprint,
        roadmap: Vec<ProjectPhase>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            idea: idea.into(),
            angle: angle.into(),
            blueprint,
            roadmap,
        }
    }
}
