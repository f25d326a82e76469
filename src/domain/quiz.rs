//! Skill-assessment quizzes and their pass/fail grading.

use serde::{Deserialize, Serialize};

/// Fraction of correct answers required to master a skill.
pub const PASS_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Must exactly match one entry of `options`.
    pub correct_answer: String,
}

/// A learning-material recommendation for the currently studied skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecommendation {
    pub title: String,
    pub description: String,
    pub youtube_search_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentResult {
    pub score: usize,
    pub total: usize,
    pub passed: bool,
}

/// Grade a completed assessment. Answers are positional; a missing answer
/// counts as wrong. An empty quiz never passes.
pub fn grade_assessment(questions: &[QuizQuestion], answers: &[String]) -> AssessmentResult {
    let score = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).is_some_and(|a| *a == q.correct_answer))
        .count();
    let total = questions.len();
    #[allow(clippy::cast_precision_loss)]
    let passed = total > 0 && (score as f64) / (total as f64) >= PASS_THRESHOLD;

    AssessmentResult {
        score,
        total,
        passed,
    }
}
