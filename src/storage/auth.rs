//! Email/password authentication against the GoTrue endpoints.

use crate::config::StorageConfig;
use crate::error::StorageError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// An authenticated session. The access token is attached to every
/// PostgREST request so row-level security resolves to this user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

// Wire shapes for the token and signup endpoints. Signup responses nest the
// session under the same keys when email confirmation is disabled.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl AuthErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.message)
    }
}

#[derive(Debug)]
pub struct AuthClient {
    base_url: String,
    anon_key: String,
    timeout: Duration,
    client: Client,
}

impl AuthClient {
    /// Build an auth client. Both the project URL and the anon key are
    /// required; refusing to construct beats failing on the first call.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let (base_url, anon_key) = resolve_project(config)?;
        Ok(Self {
            base_url,
            anon_key,
            timeout: Duration::from_secs(config.request_timeout_secs),
            client: Client::new(),
        })
    }

    /// Register a new account. Returns a live session when the project has
    /// email confirmation disabled; otherwise the caller must sign in after
    /// confirming.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, StorageError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        self.token_request("sign_up", &url, email, password).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StorageError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        self.token_request("sign_in", &url, email, password).await
    }

    /// Revoke the session server-side. A failed logout is reported but the
    /// caller should still drop its local session.
    pub async fn sign_out(&self, session: &AuthSession) -> Result<(), StorageError> {
        let operation = "sign_out";
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .send(operation, || {
                self.client
                    .post(&url)
                    .header("apikey", &self.anon_key)
                    .bearer_auth(&session.access_token)
                    .send()
            })
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(operation, response).await);
        }
        Ok(())
    }

    async fn token_request(
        &self,
        operation: &str,
        url: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StorageError> {
        let body = json!({"email": email, "password": password});
        let response = self
            .send(operation, || {
                self.client
                    .post(url)
                    .header("apikey", &self.anon_key)
                    .json(&body)
                    .send()
            })
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(operation, response).await);
        }

        let parsed: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| StorageError::Request {
                    operation: operation.to_string(),
                    message: e.to_string(),
                })?;

        let (Some(access_token), Some(user)) = (parsed.access_token, parsed.user) else {
            return Err(StorageError::Auth {
                message: "no session returned; the account may require email confirmation".into(),
            });
        };

        tracing::info!(operation, user_id = %user.id, "authenticated");
        Ok(AuthSession {
            user_id: user.id,
            access_token,
            refresh_token: parsed.refresh_token,
            expires_at: Utc::now() + ChronoDuration::seconds(parsed.expires_in.unwrap_or(3600)),
        })
    }

    async fn send<F, Fut>(&self, operation: &str, request: F) -> Result<reqwest::Response, StorageError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        match tokio::time::timeout(self.timeout, request()).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(StorageError::Request {
                operation: operation.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(StorageError::Timeout {
                operation: operation.to_string(),
                secs: self.timeout.as_secs(),
            }),
        }
    }

    async fn error_from_response(
        &self,
        operation: &str,
        response: reqwest::Response,
    ) -> StorageError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthErrorBody>(&body)
            .ok()
            .and_then(AuthErrorBody::into_message)
            .unwrap_or(body);

        if status.as_u16() == 400 || status.as_u16() == 401 || status.as_u16() == 422 {
            StorageError::Auth { message }
        } else {
            StorageError::Request {
                operation: operation.to_string(),
                message: format!("{status}: {message}"),
            }
        }
    }
}

/// Validate and normalize the project settings shared by auth and store.
pub(crate) fn resolve_project(config: &StorageConfig) -> Result<(String, String), StorageError> {
    let raw_url = config
        .project_url
        .as_deref()
        .map(|u| u.trim_end_matches('/'))
        .filter(|u| !u.is_empty())
        .ok_or_else(|| StorageError::Misconfigured {
            message: "storage project URL is not configured".into(),
            remediation: "Set SUPABASE_URL (or storage.project_url in config.toml) to your \
                          project URL, e.g. https://xyz.supabase.co"
                .into(),
        })?;
    let base_url = url::Url::parse(raw_url)
        .map_err(|e| StorageError::Misconfigured {
            message: format!("storage project URL is not a valid URL: {e}"),
            remediation: "Set SUPABASE_URL to a full URL including the scheme, e.g. \
                          https://xyz.supabase.co"
                .into(),
        })?
        .to_string();
    let base_url = base_url.trim_end_matches('/').to_string();
    let anon_key = config
        .anon_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| StorageError::Misconfigured {
            message: "storage anon key is not configured".into(),
            remediation: "Set SUPABASE_ANON_KEY (or storage.anon_key in config.toml) to your \
                          project's public anon key"
                .into(),
        })?
        .to_string();
    Ok((base_url, anon_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_url_is_misconfigured() {
        let config = StorageConfig {
            anon_key: Some("anon".into()),
            ..StorageConfig::default()
        };
        let err = AuthClient::new(&config).unwrap_err();
        assert!(matches!(err, StorageError::Misconfigured { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_project_url_is_misconfigured() {
        let config = StorageConfig {
            project_url: Some("not a url".into()),
            anon_key: Some("anon".into()),
            ..StorageConfig::default()
        };
        let err = AuthClient::new(&config).unwrap_err();
        assert!(matches!(err, StorageError::Misconfigured { .. }));
    }

    #[test]
    fn expired_session_detection() {
        let session = AuthSession {
            user_id: "u".into(),
            access_token: "t".into(),
            refresh_token: None,
            expires_at: Utc::now() - ChronoDuration::seconds(1),
        };
        assert!(session.is_expired());

        let live = AuthSession {
            expires_at: Utc::now() + ChronoDuration::hours(1),
            ..session
        };
        assert!(!live.is_expired());
    }

    #[test]
    fn auth_error_body_prefers_error_description() {
        let body: AuthErrorBody =
            serde_json::from_str(r#"{"error_description": "Invalid login credentials"}"#).unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("Invalid login credentials")
        );
    }
}
