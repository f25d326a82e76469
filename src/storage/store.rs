//! The user-document store: one PostgREST row per user, with the whole
//! `UserData` document in a jsonb column.

use crate::config::StorageConfig;
use crate::domain::UserData;
use crate::error::StorageError;
use crate::storage::auth::{AuthSession, resolve_project};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

// PostgREST's "zero rows for a single-object request" code. Expected for
// brand-new users, not an error.
const NOT_FOUND_CODE: &str = "PGRST116";

// Postgres "undefined_table".
const UNDEFINED_TABLE_CODE: &str = "42P01";

const SETUP_SQL: &str = r#"CREATE TABLE public.profiles (
  id uuid PRIMARY KEY REFERENCES auth.users(id) ON DELETE CASCADE,
  user_data jsonb
);
ALTER TABLE public.profiles ENABLE ROW LEVEL SECURITY;
CREATE POLICY "Allow users to manage their own profile"
ON public.profiles FOR ALL USING (auth.uid() = id) WITH CHECK (auth.uid() = id);
GRANT SELECT, INSERT, UPDATE, DELETE ON TABLE public.profiles TO anon;
GRANT USAGE ON SCHEMA public TO anon;"#;

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserDataRow {
    user_data: Option<UserData>,
}

pub struct UserStore {
    base_url: String,
    anon_key: String,
    table: String,
    timeout: Duration,
    client: Client,
}

impl UserStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let (base_url, anon_key) = resolve_project(config)?;
        Ok(Self {
            base_url,
            anon_key,
            table: config.table.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            client: Client::new(),
        })
    }

    /// Fetch the user's document. `Ok(None)` means the user has no row yet,
    /// which is the normal state before onboarding completes.
    pub async fn fetch(&self, session: &AuthSession) -> Result<Option<UserData>, StorageError> {
        let operation = "fetch_user_data";
        let url = format!(
            "{}/rest/v1/{}?id=eq.{}&select=user_data",
            self.base_url, self.table, session.user_id
        );

        let response = self
            .send(operation, || {
                self.client
                    .get(&url)
                    .header("apikey", &self.anon_key)
                    .bearer_auth(&session.access_token)
                    // Ask PostgREST for a single object, not a one-row array.
                    .header("Accept", "application/vnd.pgrst.object+json")
                    .send()
            })
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let parsed: Option<RestErrorBody> = serde_json::from_str(&body).ok();
            if parsed
                .as_ref()
                .and_then(|e| e.code.as_deref())
                .is_some_and(|code| code == NOT_FOUND_CODE)
            {
                return Ok(None);
            }
            return Err(rest_error(operation, status, parsed, &body));
        }

        let row: UserDataRow =
            serde_json::from_str(&body).map_err(|e| StorageError::Request {
                operation: operation.to_string(),
                message: format!("unexpected response shape: {e}"),
            })?;
        Ok(row.user_data)
    }

    /// Create or replace the user's document. The whole document is written
    /// every time; PostgREST merges on the `id` primary key.
    pub async fn upsert(
        &self,
        session: &AuthSession,
        user_data: &UserData,
    ) -> Result<(), StorageError> {
        let operation = "save_user_data";
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let body = json!({"id": session.user_id, "user_data": user_data});

        let response = self
            .send(operation, || {
                self.client
                    .post(&url)
                    .header("apikey", &self.anon_key)
                    .bearer_auth(&session.access_token)
                    .header("Prefer", "resolution=merge-duplicates,return=minimal")
                    .json(&body)
                    .send()
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let parsed: Option<RestErrorBody> = serde_json::from_str(&text).ok();
            return Err(rest_error(operation, status, parsed, &text));
        }

        tracing::debug!(operation, user_id = %session.user_id, "user document saved");
        Ok(())
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
}

/// Classify a PostgREST failure. A missing table and an RLS denial both need
/// operator action in the dashboard, so they carry the setup script.
fn rest_error(
    operation: &str,
    status: StatusCode,
    parsed: Option<RestErrorBody>,
    raw_body: &str,
) -> StorageError {
    let code = parsed.as_ref().and_then(|e| e.code.clone());
    let message = parsed
        .and_then(|e| e.message)
        .unwrap_or_else(|| raw_body.to_string());

    let missing_table = code.as_deref() == Some(UNDEFINED_TABLE_CODE)
        || message.contains("does not exist");
    let rls_denied = message.to_ascii_lowercase().contains("row-level security");

    if missing_table || rls_denied {
        return StorageError::Misconfigured {
            message,
            remediation: format!(
                "Run the following in the project's SQL editor:\n{SETUP_SQL}"
            ),
        };
    }

    if status == StatusCode::UNAUTHORIZED {
        return StorageError::Auth { message };
    }

    StorageError::Request {
        operation: operation.to_string(),
        message: format!("{status}: {message}"),
    }
}
