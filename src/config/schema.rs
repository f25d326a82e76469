use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub writeback: WritebackConfig,
}

// ── Content generation backend ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// API key for the generative backend. Usually supplied via
    /// `GEMINI_API_KEY` rather than written to disk.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_content_base_url")]
    pub base_url: String,
    /// Fast model for short structured generations (skills, quizzes, angles).
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Stronger model for profile synthesis and planning.
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Caller-side deadline for most generation calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Profile synthesis gets a longer deadline than quick generations.
    #[serde(default = "default_profile_timeout")]
    pub profile_timeout_secs: u64,
    /// Image generation is the slowest call in the onboarding join.
    #[serde(default = "default_avatar_timeout")]
    pub avatar_timeout_secs: u64,
}

fn default_content_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_reasoning_model() -> String {
    "gemini-2.5-pro".into()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-001".into()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_profile_timeout() -> u64 {
    30
}

fn default_avatar_timeout() -> u64 {
    60
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_content_base_url(),
            text_model: default_text_model(),
            reasoning_model: default_reasoning_model(),
            image_model: default_image_model(),
            request_timeout_secs: default_request_timeout(),
            profile_timeout_secs: default_profile_timeout(),
            avatar_timeout_secs: default_avatar_timeout(),
        }
    }
}

// ── Auth / storage backend ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub project_url: Option<String>,
    /// Public (anon) API key. Usually supplied via `SUPABASE_ANON_KEY`.
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Table holding one `user_data` jsonb document per user id.
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_storage_timeout")]
    pub request_timeout_secs: u64,
}

fn default_table() -> String {
    "profiles".into()
}

fn default_storage_timeout() -> u64 {
    15
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            project_url: None,
            anon_key: None,
            table: default_table(),
            request_timeout_secs: default_storage_timeout(),
        }
    }
}

// ── Persistence write-back ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritebackConfig {
    /// Retry attempts after the first failed save.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay; doubles per attempt, capped at 10s.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    500
}

impl Default for WritebackConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

// ── Load / save ───────────────────────────────────────────────────

impl Config {
    /// Load `~/.quester/config.toml`, creating it with defaults on first
    /// run. Environment overrides are applied after loading.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let quester_dir = home.join(".quester");
        let config_path = quester_dir.join("config.toml");

        if !quester_dir.exists() {
            fs::create_dir_all(&quester_dir).context("Failed to create .quester directory")?;
        }

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate().map_err(anyhow::Error::from)?;
        Ok(config)
    }

    /// Load from an explicit path without touching the home directory.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // Content API key: GEMINI_API_KEY, then GOOGLE_API_KEY
        if let Ok(key) = std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            if !key.is_empty() {
                self.content.api_key = Some(key);
            }
        }

        // Storage project: SUPABASE_URL / SUPABASE_ANON_KEY
        if let Ok(project_url) = std::env::var("SUPABASE_URL") {
            if !project_url.is_empty() {
                self.storage.project_url = Some(project_url);
            }
        }
        if let Ok(anon_key) = std::env::var("SUPABASE_ANON_KEY") {
            if !anon_key.is_empty() {
                self.storage.anon_key = Some(anon_key);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, secs) in [
            ("content.request_timeout_secs", self.content.request_timeout_secs),
            ("content.profile_timeout_secs", self.content.profile_timeout_secs),
            ("content.avatar_timeout_secs", self.content.avatar_timeout_secs),
            ("storage.request_timeout_secs", self.storage.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Validation(format!("{name} must be positive")));
            }
        }
        if self.writeback.base_backoff_ms == 0 {
            return Err(ConfigError::Validation(
                "writeback.base_backoff_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
