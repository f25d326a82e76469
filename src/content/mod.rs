//! Client for the generative content backend: structured JSON generations
//! (profile, skills, quizzes, project plans) and avatar images.

pub mod client;
pub mod extract;
pub mod prompts;
pub mod schema;

pub use client::GeminiClient;
pub use extract::{parse_json_payload, strip_markdown_fences};
