//! End-to-end onboarding flow against a mock backend.

use quester::config::ContentConfig;
use quester::content::GeminiClient;
use quester::domain::QuestionnaireAnswers;
use quester::error::ContentError;
use quester::onboard::complete_questionnaire;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = ContentConfig {
        api_key: Some("test-key".into()),
        base_url: server.uri(),
        ..ContentConfig::default()
    };
    GeminiClient::new(config).unwrap()
}

fn answers() -> QuestionnaireAnswers {
    let mut answers = QuestionnaireAnswers::new();
    answers.insert("name".into(), "Ada".into());
    answers.insert("learning_style".into(), "Visual".into());
    answers
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

const PROFILE_JSON: &str = r#"{"name": "Ada", "focus": "Systems Thinker",
    "personality": "p", "strengths": ["s"], "weaknesses": ["w"], "dream": "d",
    "learningStyle": "Visual", "avatarDescription": "a ranger"}"#;

const SKILLS_JSON: &str = r#"[
    {"id": "observation", "name": "Observation", "description": "",
     "status": "learning", "dependencies": []}
]"#;

#[tokio::test]
async fn questionnaire_produces_a_complete_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(text_response(PROFILE_JSON))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(text_response(SKILLS_JSON))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/imagen-4.0-generate-001:predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{"bytesBase64Encoded": "aVBORw=="}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = complete_questionnaire(&client_for(&server), &answers())
        .await
        .unwrap();
    assert_eq!(data.profile.name, "Ada");
    assert_eq!(data.avatar_url, "data:image/png;base64,aVBORw==");
    assert_eq!(data.skills.len(), 1);
    assert!(data.projects.is_empty());
}

#[tokio::test]
async fn skill_failure_fails_the_whole_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(text_response(PROFILE_JSON))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/imagen-4.0-generate-001:predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{"bytesBase64Encoded": "aVBORw=="}]
        })))
        .mount(&server)
        .await;

    let err = complete_questionnaire(&client_for(&server), &answers())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Request { .. }));
}

#[tokio::test]
async fn profile_failure_skips_downstream_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    // No skills or avatar mocks: any downstream call would 404 the mock
    // server and still show up in its verification.

    let err = complete_questionnaire(&client_for(&server), &answers())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Request { .. }));
}
