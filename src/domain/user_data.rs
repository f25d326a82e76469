use super::{CognitiveProfile, Project, Skill};
use serde::{Deserialize, Serialize};

/// The single JSON document persisted per user: profile, avatar, skill
/// collection, and projects. The storage backend stores it whole; every save
/// replaces the full document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub profile: CognitiveProfile,
    pub avatar_url: String,
    /// Documents written by earlier versions may omit either list.
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub projects: Vec<Project>,
}
