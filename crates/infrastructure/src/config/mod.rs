//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `moderation`: blocklist screening
//! - `artifacts`: generated audio storage
//! - `session`: per-request behaviour
//!
//! Provider sections reuse the provider crates' own config types
//! (`ai_core::InferenceConfig`, `ai_speech::SpeechConfig`).
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file (`config.toml`, or the path in `SOLACE_CONFIG`), then environment
//! variables such as `SOLACE_SERVER__PORT=8080`.

mod artifacts;
mod moderation;
mod server;
mod session;

use std::path::Path;

use ai_core::{InferenceConfig, LlmProvider};
use ai_speech::{SpeechConfig, TtsProvider};
use application::services::SessionConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::retry::RetryConfig;

pub use artifacts::ArtifactsConfig;
pub use moderation::ModerationConfig;
pub use server::ServerConfig;
pub use session::SessionAppConfig;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "SOLACE_CONFIG";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "SOLACE";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Language model configuration
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Speech recognition and synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Blocklist configuration
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Generated audio storage
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    /// Per-request behaviour
    #[serde(default)]
    pub session: SessionAppConfig,

    /// Retry configuration for provider calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `SOLACE_CONFIG` for the file path, defaulting to `config.toml`
    /// in the working directory. A missing default file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        let mut config = Self::load_from(path.as_deref().map(Path::new))?;
        config.apply_env_fallbacks(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file (required if given) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., SOLACE_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Fill missing provider credentials from their well-known variables
    ///
    /// Only empty fields are populated, so values from the config file or
    /// `SOLACE_*` variables take precedence.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |names: &[&str]| -> Option<SecretString> {
            names
                .iter()
                .filter_map(|name| lookup(*name))
                .find(|value| !value.trim().is_empty())
                .map(SecretString::from)
        };

        if self.inference.api_key.as_deref().is_none_or(str::is_empty) {
            let names: &[&str] = match self.inference.provider {
                LlmProvider::OpenAi => &["OPENAI_API_KEY"],
                LlmProvider::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            };
            if let Some(key) = secret(names) {
                self.inference.api_key = Some(key.expose_secret().to_string());
                debug!(provider = %self.inference.provider, "Loaded inference API key from environment");
            }
        }

        if self.speech.openai_api_key.as_deref().is_none_or(str::is_empty) {
            if let Some(key) = secret(&["OPENAI_API_KEY"]) {
                self.speech.openai_api_key = Some(key.expose_secret().to_string());
                debug!("Loaded speech OpenAI API key from environment");
            }
        }
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate().map_err(|e| format!("[server] {e}"))?;
        self.inference
            .validate()
            .map_err(|e| format!("[inference] {e}"))?;
        self.speech.validate().map_err(|e| format!("[speech] {e}"))?;
        self.artifacts
            .validate()
            .map_err(|e| format!("[artifacts] {e}"))?;
        self.session.validate().map_err(|e| format!("[session] {e}"))?;
        self.retry.validate().map_err(|e| format!("[retry] {e}"))?;
        Ok(())
    }

    /// Orchestrator settings derived from the session and artifact sections
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            sentiment_enabled: self.session.sentiment_enabled,
            request_timeout: self.session.request_timeout(),
            public_base_url: self.artifacts.public_base_url.clone(),
        }
    }

    /// Log configuration that is valid but likely unintended
    pub fn warn_on_suspicious_settings(&self) {
        if !self.speech.transcription_enabled() {
            warn!("speech.staging_bucket is not set, audio messages will not be transcribed");
        }
        if self.speech.transcription_timeout_ms / 1000 >= self.session.request_timeout_secs {
            warn!(
                transcription_timeout_ms = self.speech.transcription_timeout_ms,
                request_timeout_secs = self.session.request_timeout_secs,
                "Transcription timeout exceeds the request timeout"
            );
        }
        if !self.moderation.enabled {
            warn!("Moderation is disabled, messages are not screened");
        }
        if self.speech.tts_provider == TtsProvider::OpenAi
            && self.inference.provider == LlmProvider::Gemini
        {
            debug!("Using OpenAI speech with Gemini replies, two API keys are required");
        }
    }
}
