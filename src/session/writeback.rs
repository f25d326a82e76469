//! Queued persistence with retry.
//!
//! Saves are fire-and-forget from the caller's point of view: transitions
//! enqueue the new document and move on, while a background worker writes it
//! out. Queued documents coalesce to the newest one, so a burst of skill
//! completions costs one request.

use crate::config::WritebackConfig;
use crate::domain::UserData;
use crate::error::SessionError;
use crate::storage::{AuthSession, UserStore};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const MAX_BACKOFF_MS: u64 = 10_000;

pub struct WritebackQueue {
    tx: mpsc::UnboundedSender<UserData>,
    worker: JoinHandle<()>,
}

impl WritebackQueue {
    /// Start the background writer for one signed-in session.
    pub fn spawn(store: UserStore, session: AuthSession, config: WritebackConfig) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<UserData>();
        let worker = tokio::spawn(async move {
            while let Some(mut doc) = rx.recv().await {
                // Last write wins: skip straight to the newest queued state.
                let mut skipped = 0usize;
                while let Ok(newer) = rx.try_recv() {
                    doc = newer;
                    skipped += 1;
                }
                if skipped > 0 {
                    tracing::debug!(skipped, "coalesced queued documents");
                }
                persist_with_retry(&store, &session, &doc, &config).await;
            }
        });
        Self { tx, worker }
    }

    /// Queue the document for saving. Fails only if the worker is gone.
    pub fn enqueue(&self, data: UserData) -> Result<(), SessionError> {
        self.tx
            .send(data)
            .map_err(|_| SessionError::Writeback("write-back worker has stopped".into()))
    }

    /// Drain remaining documents and stop the worker. Call on sign-out so no
    /// queued save is lost.
    pub async fn close(self) -> Result<(), SessionError> {
        drop(self.tx);
        self.worker
            .await
            .map_err(|e| SessionError::Writeback(e.to_string()))
    }
}

async fn persist_with_retry(
    store: &UserStore,
    session: &AuthSession,
    doc: &UserData,
    config: &WritebackConfig,
) {
    let mut backoff_ms = config.base_backoff_ms.max(50);

    for attempt in 0..=config.max_retries {
        match store.upsert(session, doc).await {
            Ok(()) => {
                if attempt > 0 {
                    tracing::info!(attempt, "save recovered after retries");
                }
                return;
            }
            Err(e) if !e.is_retryable() => {
                tracing::error!(error = %e, "save failed with non-retryable error, dropping document");
                return;
            }
            Err(e) => {
                if attempt < config.max_retries {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = config.max_retries,
                        error = %e,
                        "save failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = backoff_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
                } else {
                    tracing::error!(error = %e, "save failed after all retries, dropping document");
                }
            }
        }
    }
}
