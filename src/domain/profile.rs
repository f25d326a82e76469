use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answers keyed by question id, as collected by the questionnaire.
/// A `BTreeMap` keeps prompt construction deterministic.
pub type QuestionnaireAnswers = BTreeMap<String, String>;

/// The gamified profile produced from questionnaire answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveProfile {
    pub name: String,
    /// Short title for the user's cognitive focus, e.g. "Visionary Tinkerer".
    pub focus: String,
    pub personality: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub dream: String,
    pub learning_style: String,
    /// Visual prompt used for avatar generation.
    pub avatar_description: String,
}
