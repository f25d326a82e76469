pub mod profile;
pub mod project;
pub mod quiz;
pub mod skill;
pub mod user_data;

pub use profile::{CognitiveProfile, QuestionnaireAnswers};
pub use project::{Project, ProjectBlueprint, ProjectPhase, ProjectTask};
pub use quiz::{AssessmentResult, QuizQuestion, VideoRecommendation, grade_assessment};
pub use skill::{Skill, SkillStatus};
pub use user_data::UserData;
