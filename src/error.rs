use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `quester`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum QuesterError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Content generation ──────────────────────────────────────────────
    #[error("content: {0}")]
    Content(#[from] ContentError),

    // ── Auth / storage backend ──────────────────────────────────────────
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    // ── Session ─────────────────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Content generation errors ──────────────────────────────────────────────

/// Failures from the external content-generation backend.
///
/// `Request` and `Timeout` are retry-eligible from the caller's point of
/// view; `MalformedResponse` means the backend answered but the payload did
/// not match the expected schema, and retrying without a prompt change is
/// unlikely to help.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{operation} request failed: {message}")]
    Request { operation: String, message: String },

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    #[error("{operation} returned a malformed response: {message}")]
    MalformedResponse { operation: String, message: String },

    #[error("content API key not configured. Set GEMINI_API_KEY or add api_key to config.toml")]
    MissingApiKey,

    #[error("{operation} returned an empty result")]
    Empty { operation: String },
}

// ─── Auth / storage errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{operation} request failed: {message}")]
    Request { operation: String, message: String },

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    #[error("authentication failed: {message}")]
    Auth { message: String },

    #[error("backend misconfigured: {message}\n{remediation}")]
    Misconfigured { message: String, remediation: String },
}

impl StorageError {
    /// Whether retrying the same request can succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::Timeout { .. })
    }
}

// ─── Session errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not signed in")]
    NotSignedIn,

    #[error("write-back: {0}")]
    Writeback(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, QuesterError>;
