#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod graph;
pub mod layout;
pub mod observability;
pub mod onboard;
pub mod session;
pub mod storage;

pub use config::Config;
pub use domain::{
    CognitiveProfile, Project, ProjectBlueprint, ProjectPhase, ProjectTask, QuestionnaireAnswers,
    QuizQuestion, Skill, SkillStatus, UserData,
};
pub use error::{ConfigError, ContentError, QuesterError, Result, SessionError, StorageError};
pub use graph::CascadeOutcome;
pub use layout::{SkillLayout, layout_skills};
pub use session::{SessionContext, Transition, WritebackQueue};
