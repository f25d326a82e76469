//! HTTP client for the generative content backend.
//!
//! Text operations go through `models/{model}:generateContent` with a JSON
//! response schema; avatar images go through `models/{model}:predict`. Every
//! call carries a caller-side deadline so the onboarding join cannot hang on
//! a stalled request.

use crate::config::ContentConfig;
use crate::content::{extract::parse_json_payload, prompts, schema::*};
use crate::domain::{
    CognitiveProfile, ProjectBlueprint, ProjectPhase, QuestionnaireAnswers, QuizQuestion, Skill,
    SkillStatus, VideoRecommendation,
};
use crate::error::ContentError;
use crate::graph;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

#[derive(Debug)]
pub struct GeminiClient {
    config: ContentConfig,
    api_key: String,
    client: Client,
}

impl GeminiClient {
    /// Build a client from config. The key must already be resolved (config
    /// file or env override); without one every call would fail, so reject
    /// construction up front.
    pub fn new(config: ContentConfig) -> Result<Self, ContentError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ContentError::MissingApiKey)?
            .to_string();

        Ok(Self {
            config,
            api_key,
            client: Client::new(),
        })
    }

    // ── Profile & avatar ────────────────────────────────────────────────

    pub async fn generate_cognitive_profile(
        &self,
        answers: &QuestionnaireAnswers,
    ) -> Result<CognitiveProfile, ContentError> {
        let text = self
            .generate_json(
                "generate_cognitive_profile",
                &self.config.reasoning_model,
                &prompts::cognitive_profile(answers),
                prompts::cognitive_profile_schema(),
                self.config.profile_timeout_secs,
            )
            .await?;
        parse_json_payload("generate_cognitive_profile", &text)
    }

    /// Generate an avatar image and return it as a `data:image/png;base64,`
    /// URL, ready to store alongside the rest of the user document.
    pub async fn generate_avatar(&self, description: &str) -> Result<String, ContentError> {
        self.predict_image("generate_avatar", &prompts::avatar(description))
            .await
    }

    /// Re-render an existing avatar with a user-requested modification.
    pub async fn customize_avatar(
        &self,
        original_description: &str,
        modification: &str,
    ) -> Result<String, ContentError> {
        self.predict_image(
            "customize_avatar",
            &prompts::avatar_customization(original_description, modification),
        )
        .await
    }

    // ── Skill trees ─────────────────────────────────────────────────────

    pub async fn generate_initial_skills(
        &self,
        profile: &CognitiveProfile,
    ) -> Result<Vec<Skill>, ContentError> {
        self.generate_skill_set(
            "generate_initial_skills",
            &self.config.text_model,
            &prompts::initial_skills(profile),
        )
        .await
    }

    pub async fn generate_career_skill_tree(
        &self,
        career_path: &str,
        profile: &CognitiveProfile,
    ) -> Result<Vec<Skill>, ContentError> {
        self.generate_skill_set(
            "generate_career_skill_tree",
            &self.config.reasoning_model,
            &prompts::career_skill_tree(career_path, profile),
        )
        .await
    }

    /// Generate a single user-named skill. The model picks the id and
    /// description; the dependency list and derived status are pinned on our
    /// side so the new node always attaches where the user asked.
    pub async fn generate_custom_skill(
        &self,
        skill_name: &str,
        profile: &CognitiveProfile,
        dependencies: &[String],
    ) -> Result<Skill, ContentError> {
        let operation = "generate_custom_skill";
        let text = self
            .generate_json(
                operation,
                &self.config.text_model,
                &prompts::custom_skill(skill_name, profile, dependencies),
                prompts::skill_object_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        let mut skill: Skill = parse_json_payload(operation, &text)?;
        skill.dependencies = dependencies.to_vec();
        skill.status = if dependencies.is_empty() {
            SkillStatus::Learning
        } else {
            SkillStatus::Locked
        };
        Ok(skill)
    }

    async fn generate_skill_set(
        &self,
        operation: &str,
        model: &str,
        prompt: &str,
    ) -> Result<Vec<Skill>, ContentError> {
        let text = self
            .generate_json(
                operation,
                model,
                prompt,
                prompts::skill_array_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        let skills: Vec<Skill> = parse_json_payload(operation, &text)?;
        if skills.is_empty() {
            return Err(ContentError::Empty {
                operation: operation.to_string(),
            });
        }
        // A duplicate id or a cycle would corrupt the unlock cascade.
        graph::validate_skills(&skills).map_err(|e| ContentError::MalformedResponse {
            operation: operation.to_string(),
            message: e.to_string(),
        })?;
        Ok(skills)
    }

    // ── Coaching & assessment ───────────────────────────────────────────

    pub async fn generate_improvement_suggestions(
        &self,
        profile: &CognitiveProfile,
    ) -> Result<Vec<String>, ContentError> {
        let operation = "generate_improvement_suggestions";
        let text = self
            .generate_json(
                operation,
                &self.config.reasoning_model,
                &prompts::improvement_suggestions(profile),
                prompts::string_array_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        parse_json_payload(operation, &text)
    }

    /// Plain-text challenge, no response schema.
    pub async fn generate_skill_challenge(&self, skill_name: &str) -> Result<String, ContentError> {
        let operation = "generate_skill_challenge";
        let text = self
            .generate_text(
                operation,
                &self.config.text_model,
                &prompts::skill_challenge(skill_name),
                self.config.request_timeout_secs,
            )
            .await?;
        Ok(text.trim().to_string())
    }

    pub async fn generate_video_recommendations(
        &self,
        skill_name: &str,
        profile: &CognitiveProfile,
    ) -> Result<Vec<VideoRecommendation>, ContentError> {
        let operation = "generate_video_recommendations";
        let text = self
            .generate_json(
                operation,
                &self.config.text_model,
                &prompts::video_recommendations(skill_name, profile),
                prompts::video_recommendations_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        parse_json_payload(operation, &text)
    }

    pub async fn generate_skill_assessment(
        &self,
        skill_name: &str,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        let operation = "generate_skill_assessment";
        let text = self
            .generate_json(
                operation,
                &self.config.text_model,
                &prompts::skill_assessment(skill_name),
                prompts::skill_assessment_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        parse_json_payload(operation, &text)
    }

    // ── Project Genesis ─────────────────────────────────────────────────

    pub async fn generate_project_angles(&self, idea: &str) -> Result<Vec<String>, ContentError> {
        let operation = "generate_project_angles";
        let text = self
            .generate_json(
                operation,
                &self.config.text_model,
                &prompts::project_angles(idea),
                prompts::string_array_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        parse_json_payload(operation, &text)
    }

    pub async fn generate_project_blueprint(
        &self,
        project_angle: &str,
        skills: &[Skill],
    ) -> Result<ProjectBlueprint, ContentError> {
        let operation = "generate_project_blueprint";
        let text = self
            .generate_json(
                operation,
                &self.config.reasoning_model,
                &prompts::project_blueprint(project_angle, skills),
                prompts::project_blueprint_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        parse_json_payload(operation, &text)
    }

    pub async fn generate_project_roadmap(
        &self,
        project_angle: &str,
    ) -> Result<Vec<ProjectPhase>, ContentError> {
        let operation = "generate_project_roadmap";
        let text = self
            .generate_json(
                operation,
                &self.config.reasoning_model,
                &prompts::project_roadmap(project_angle),
                prompts::project_roadmap_schema(),
                self.config.request_timeout_secs,
            )
            .await?;
        parse_json_payload(operation, &text)
    }

    // ── Transport ───────────────────────────────────────────────────────

    async fn generate_json(
        &self,
        operation: &str,
        model: &str,
        prompt: &str,
        response_schema: Value,
        deadline_secs: u64,
    ) -> Result<String, ContentError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: Some(response_schema),
            }),
        };
        self.call_generate(operation, model, &request, deadline_secs)
            .await
    }

    async fn generate_text(
        &self,
        operation: &str,
        model: &str,
        prompt: &str,
        deadline_secs: u64,
    ) -> Result<String, ContentError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
        };
        self.call_generate(operation, model, &request, deadline_secs)
            .await
    }

    async fn call_generate(
        &self,
        operation: &str,
        model: &str,
        request: &GenerateContentRequest,
        deadline_secs: u64,
    ) -> Result<String, ContentError> {
        let url = format!(
            "{}/v1beta/models/{model}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.api_key
        );

        let result = self
            .with_deadline(operation, deadline_secs, async {
                let response = self
                    .client
                    .post(&url)
                    .json(request)
                    .send()
                    .await
                    .map_err(|e| self.request_error(operation, &e.to_string()))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(
                        self.request_error(operation, &format!("{status}: {error_text}"))
                    );
                }

                let result: GenerateContentResponse = response
                    .json()
                    .await
                    .map_err(|e| self.request_error(operation, &e.to_string()))?;

                if let Some(err) = result.error.as_ref() {
                    return Err(self.request_error(operation, &err.message));
                }

                Ok(result)
            })
            .await?;

        let text = result
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ContentError::Empty {
                operation: operation.to_string(),
            });
        }

        tracing::debug!(operation, model, "content generation succeeded");
        Ok(text)
    }

    async fn predict_image(&self, operation: &str, prompt: &str) -> Result<String, ContentError> {
        let url = format!(
            "{}/v1beta/models/{}:predict?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.image_model,
            self.api_key
        );
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "1:1".into(),
                output_mime_type: "image/png".into(),
            },
        };

        let result = self
            .with_deadline(operation, self.config.avatar_timeout_secs, async {
                let response = self
                    .client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| self.request_error(operation, &e.to_string()))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(
                        self.request_error(operation, &format!("{status}: {error_text}"))
                    );
                }

                response
                    .json::<PredictResponse>()
                    .await
                    .map_err(|e| self.request_error(operation, &e.to_string()))
            })
            .await?;

        if let Some(err) = result.error.as_ref() {
            return Err(self.request_error(operation, &err.message));
        }

        let encoded = result
            .predictions
            .first()
            .and_then(|p| p.bytes_base64_encoded.as_deref())
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ContentError::Empty {
                operation: operation.to_string(),
            })?;

        // Reject payloads a renderer could not decode later.
        BASE64
            .decode(encoded)
            .map_err(|e| ContentError::MalformedResponse {
                operation: operation.to_string(),
                message: format!("invalid base64 image payload: {e}"),
            })?;

        Ok(format!("data:image/png;base64,{encoded}"))
    }

    async fn with_deadline<T>(
        &self,
        operation: &str,
        secs: u64,
        fut: impl Future<Output = Result<T, ContentError>>,
    ) -> Result<T, ContentError> {
        match tokio::time::timeout(Duration::from_secs(secs), fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, secs, "content generation deadline exceeded");
                Err(ContentError::Timeout {
                    operation: operation.to_string(),
                    secs,
                })
            }
        }
    }

    /// Wrap a transport failure, redacting the API key which rides in the
    /// request URL and can leak through reqwest error messages.
    fn request_error(&self, operation: &str, message: &str) -> ContentError {
        ContentError::Request {
            operation: operation.to_string(),
            message: message.replace(self.api_key.as_str(), "[REDACTED]"),
        }
    }
}
