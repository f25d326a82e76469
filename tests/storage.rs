//! Auth and user-store integration tests against a mock backend.

use quester::config::StorageConfig;
use quester::domain::{CognitiveProfile, UserData};
use quester::error::StorageError;
use quester::storage::{AuthClient, AuthSession, UserStore};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, headers, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> StorageConfig {
    StorageConfig {
        project_url: Some(server.uri()),
        anon_key: Some("anon-key".into()),
        ..StorageConfig::default()
    }
}

fn session() -> AuthSession {
    AuthSession {
        user_id: "11111111-2222-3333-4444-555555555555".into(),
        access_token: "jwt-token".into(),
        refresh_token: None,
        expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
    }
}

fn user_data() -> UserData {
    UserData {
        profile: CognitiveProfile {
            name: "Ada".into(),
            focus: "Systems Thinker".into(),
            personality: "p".into(),
            strengths: vec![],
            weaknesses: vec![],
            dream: "d".into(),
            learning_style: "Visual".into(),
            avatar_description: "a ranger".into(),
        },
        avatar_url: "data:image/png;base64,aVBORw==".into(),
        skills: vec![],
        projects: vec![],
    }
}

// ── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_in_yields_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "user": {"id": "11111111-2222-3333-4444-555555555555"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthClient::new(&config_for(&server)).unwrap();
    let session = auth.sign_in("ada@example.com", "hunter22").await.unwrap();
    assert_eq!(session.user_id, "11111111-2222-3333-4444-555555555555");
    assert!(!session.is_expired());
}

#[tokio::test]
async fn bad_credentials_map_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&config_for(&server)).unwrap();
    let err = auth.sign_in("ada@example.com", "wrong").await.unwrap_err();
    match err {
        StorageError::Auth { message } => assert!(message.contains("Invalid login")),
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_up_without_session_requires_confirmation() {
    let server = MockServer::start().await;
    // Projects with email confirmation enabled return the user but no token.
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "11111111-2222-3333-4444-555555555555"}
        })))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&config_for(&server)).unwrap();
    let err = auth.sign_up("ada@example.com", "hunter22").await.unwrap_err();
    assert!(matches!(err, StorageError::Auth { .. }));
}

#[tokio::test]
async fn sign_out_revokes_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthClient::new(&config_for(&server)).unwrap();
    auth.sign_out(&session()).await.unwrap();
}

// ── User store ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_returns_the_stored_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.11111111-2222-3333-4444-555555555555"))
        .and(query_param("select", "user_data"))
        .and(header("accept", "application/vnd.pgrst.object+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user_data": user_data()})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = UserStore::new(&config_for(&server)).unwrap();
    let fetched = store.fetch(&session()).await.unwrap().unwrap();
    assert_eq!(fetched.profile.name, "Ada");
}

#[tokio::test]
async fn missing_row_is_none_for_new_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned"
        })))
        .mount(&server)
        .await;

    let store = UserStore::new(&config_for(&server)).unwrap();
    assert!(store.fetch(&session()).await.unwrap().is_none());
}

#[tokio::test]
async fn missing_table_reports_setup_instructions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "42P01",
            "message": "relation \"public.profiles\" does not exist"
        })))
        .mount(&server)
        .await;

    let store = UserStore::new(&config_for(&server)).unwrap();
    let err = store.fetch(&session()).await.unwrap_err();
    match err {
        StorageError::Misconfigured { remediation, .. } => {
            assert!(remediation.contains("CREATE TABLE public.profiles"));
        }
        other => panic!("expected Misconfigured, got {other:?}"),
    }
}

#[tokio::test]
async fn upsert_sends_merge_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(headers(
            "prefer",
            vec!["resolution=merge-duplicates", "return=minimal"],
        ))
        .and(body_partial_json(json!({
            "id": "11111111-2222-3333-4444-555555555555"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = UserStore::new(&config_for(&server)).unwrap();
    store.upsert(&session(), &user_data()).await.unwrap();
}

#[tokio::test]
async fn rls_denial_on_save_is_misconfigured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "new row violates row-level security policy for table \"profiles\""
        })))
        .mount(&server)
        .await;

    let store = UserStore::new(&config_for(&server)).unwrap();
    let err = store.upsert(&session(), &user_data()).await.unwrap_err();
    assert!(matches!(err, StorageError::Misconfigured { .. }));
    assert!(!err.is_retryable());
}
