//! Prompt builders and response schemas for every generation operation.
//!
//! Each builder returns the prompt text; structured operations also have a
//! schema constant handed to the backend as `responseSchema`.

use crate::domain::{CognitiveProfile, QuestionnaireAnswers, Skill, SkillStatus};
use serde::Serialize;
use serde_json::{Value, json};

/// Serialize in-memory domain data for prompt embedding. Our domain types
/// contain no non-serializable values, so failure degrades to an empty
/// object rather than aborting the request.
fn embed<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".into())
}

// ── Cognitive profile ───────────────────────────────────────────────────────

pub fn cognitive_profile(answers: &QuestionnaireAnswers) -> String {
    format!(
        "Based on the following answers to a multiple-choice questionnaire, generate a detailed \
         cognitive profile for a user exploring their strengths and weaknesses for personal \
         growth. Analyze their choices to infer personality, strengths, and learning preferences.\n\
         The output MUST be a valid JSON object with keys: name (extract directly from the 'name' \
         answer), focus (a short, catchy title for their cognitive focus), personality (a \
         one-paragraph synthesis), strengths (3 key strengths), weaknesses (2 growth areas, framed \
         positively), dream (one inspiring sentence from the unlimited-resources answer), \
         learningStyle (extract directly, e.g. 'Visual', 'Kinesthetic'), and avatarDescription \
         (a visually descriptive fantasy/sci-fi avatar prompt drawn from their choices).\n\n\
         Questionnaire Answers:\n{}",
        embed(answers)
    )
}

pub fn cognitive_profile_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {"type": "STRING"},
            "focus": {"type": "STRING"},
            "personality": {"type": "STRING"},
            "strengths": {"type": "ARRAY", "items": {"type": "STRING"}},
            "weaknesses": {"type": "ARRAY", "items": {"type": "STRING"}},
            "dream": {"type": "STRING"},
            "learningStyle": {"type": "STRING"},
            "avatarDescription": {"type": "STRING"}
        }
    })
}

// ── Avatars ─────────────────────────────────────────────────────────────────

const AVATAR_STYLE: &str = "An adventurous ranger, a \"Quester\", serving as a guide. The \
    character is looking out at a vast, scenic landscape. Clean, illustrative, 2.5D art style \
    inspired by the video game Firewatch.";

pub fn avatar(description: &str) -> String {
    format!("{AVATAR_STYLE} The prompt is: \"{description}\". Square aspect ratio.")
}

pub fn avatar_customization(original_description: &str, modification: &str) -> String {
    format!(
        "{AVATAR_STYLE}\nThe original description is: \"{original_description}\".\n\
         Now, apply this modification: \"{modification}\".\n\
         Square aspect ratio. Maintain the overall character and art style but incorporate the change."
    )
}

// ── Skill trees ─────────────────────────────────────────────────────────────

const SKILL_SHAPE: &str = "The output MUST be a valid JSON array of objects, where each object \
    has: \"id\" (a unique kebab-case string, e.g. \"creative-writing\"), \"name\", \
    \"description\" (a short, one-sentence string), \"status\" (either \"learning\" or \
    \"locked\"; root skills are \"learning\", others \"locked\"), and \"dependencies\" (an array \
    of parent skill ids; empty for roots).";

pub fn initial_skills(profile: &CognitiveProfile) -> String {
    format!(
        "Based on this cognitive profile: {}, generate a list of 5 starter skills for a skill \
         tree. The skills should be relevant to the user's strengths and help address their \
         weaknesses. Create a logical tree structure: one or two root skills with no \
         dependencies, the others depending on one or more of the generated skills. {SKILL_SHAPE}",
        embed(profile)
    )
}

pub fn career_skill_tree(career_path: &str, profile: &CognitiveProfile) -> String {
    format!(
        "Generate a starter skill tree for a user aspiring to become a \"{career_path}\". Their \
         cognitive profile is: {}. The skill tree should consist of 5-7 skills in a logical tree \
         structure with one or two roots. {SKILL_SHAPE}",
        embed(profile)
    )
}

pub fn custom_skill(skill_name: &str, profile: &CognitiveProfile, dependencies: &[String]) -> String {
    format!(
        "A user with the cognitive profile: {} wants to add a new skill called \"{skill_name}\". \
         This new skill depends on the following existing skills (by id): {}. Generate a single \
         skill object: \"id\" (kebab-case, from the skill name), \"name\" (exactly \
         \"{skill_name}\"), \"description\" (one sentence, personalized to the user's learning \
         style), \"status\" (\"learning\" if the dependency list is empty, \"locked\" otherwise), \
         and \"dependencies\" (the provided ids). The output MUST be a valid JSON object.",
        embed(profile),
        embed(&dependencies)
    )
}

pub fn skill_array_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": skill_object_schema()
    })
}

pub fn skill_object_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": {"type": "STRING"},
            "name": {"type": "STRING"},
            "description": {"type": "STRING"},
            "status": {"type": "STRING"},
            "dependencies": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": ["id", "name", "description", "status", "dependencies"]
    })
}

// ── Coaching ────────────────────────────────────────────────────────────────

pub fn improvement_suggestions(profile: &CognitiveProfile) -> String {
    format!(
        "Based on the user's cognitive profile, generate 3 actionable and personalized \
         improvement suggestions. Focus on leveraging their strengths to address their \
         weaknesses, framed as clear, encouraging next steps.\n\
         Strengths: {}\nWeaknesses: {}\nLearning style: {}\n\
         The output MUST be a valid JSON array of strings, one suggestion each.",
        profile.strengths.join(", "),
        profile.weaknesses.join(", "),
        profile.learning_style
    )
}

pub fn skill_challenge(skill_name: &str) -> String {
    format!(
        "Generate a single, short, project-based challenge to test the understanding of the \
         skill \"{skill_name}\". Describe it in one or two sentences. Do not respond in JSON, \
         just a plain string."
    )
}

pub fn video_recommendations(skill_name: &str, profile: &CognitiveProfile) -> String {
    format!(
        "Based on the skill \"{skill_name}\" and the user's learning style \
         \"{}\", generate 3 video recommendations from YouTube. For each, provide a catchy \
         title, a short one-sentence description, and a valid YouTube search URL. The output \
         MUST be a valid JSON array of objects.",
        profile.learning_style
    )
}

pub fn video_recommendations_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {"type": "STRING"},
                "description": {"type": "STRING"},
                "youtubeSearchUrl": {"type": "STRING"}
            },
            "required": ["title", "description", "youtubeSearchUrl"]
        }
    })
}

pub fn string_array_schema() -> Value {
    json!({"type": "ARRAY", "items": {"type": "STRING"}})
}

// ── Project Genesis ─────────────────────────────────────────────────────────

pub fn project_angles(idea: &str) -> String {
    format!(
        "As a creative project strategist, brainstorm 3 distinct and innovative angles for the \
         following project idea: \"{idea}\". Frame them as short, compelling pitches. The output \
         MUST be a valid JSON array of strings."
    )
}

pub fn project_blueprint(project_angle: &str, skills: &[Skill]) -> String {
    let mastered: Vec<&str> = skills
        .iter()
        .filter(|s| s.status == SkillStatus::Mastered)
        .map(|s| s.name.as_str())
        .collect();
    format!(
        "Analyze the following project concept: \"{project_angle}\". A user has already mastered \
         these skills: {}. First, determine 5-7 essential skills required to complete this \
         project. Second, compare the required list with the user's mastered skills. The output \
         MUST be a valid JSON object with keys requiredSkills (all skills needed), \
         skillStrengths (required skills the user already has), and skillGaps (required skills \
         the user is missing).",
        embed(&mastered)
    )
}

pub fn project_blueprint_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "requiredSkills": {"type": "ARRAY", "items": {"type": "STRING"}},
            "skillStrengths": {"type": "ARRAY", "items": {"type": "STRING"}},
            "skillGaps": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": ["requiredSkills", "skillStrengths", "skillGaps"]
    })
}

pub fn project_roadmap(project_angle: &str) -> String {
    format!(
        "Create a detailed, actionable project roadmap for the project: \"{project_angle}\". \
         Break it into 3-4 logical phases (e.g. 'Prototyping', 'Development', 'Launch'), each \
         with 2-3 specific tasks carrying a short name and a one-sentence description. The \
         output MUST be a valid JSON array of phase objects, each with phaseName and tasks \
         (array of objects with taskName and description)."
    )
}

pub fn project_roadmap_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "phaseName": {"type": "STRING"},
                "tasks": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "taskName": {"type": "STRING"},
                            "description": {"type": "STRING"}
                        },
                        "required": ["taskName", "description"]
                    }
                }
            },
            "required": ["phaseName", "tasks"]
        }
    })
}

// ── Assessment ──────────────────────────────────────────────────────────────

pub fn skill_assessment(skill_name: &str) -> String {
    format!(
        "Generate a 3-question multiple-choice quiz to assess a user's understanding of the \
         skill: \"{skill_name}\". Each question has 4 options, one of which is correct, and \
         should be practical and concept-based. The output MUST be a valid JSON array of objects \
         with keys question, options (4 strings), and correctAnswer (exactly matching one \
         option)."
    )
}

pub fn skill_assessment_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": {"type": "STRING"},
                "options": {"type": "ARRAY", "items": {"type": "STRING"}},
                "correctAnswer": {"type": "STRING"}
            },
            "required": ["question", "options", "correctAnswer"]
        }
    })
}
