//! Configuration for language-model providers

use serde::{Deserialize, Serialize};

/// Which hosted language model to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI chat completions (or any compatible endpoint)
    #[default]
    OpenAi,
    /// Google Gemini generateContent
    Gemini,
}

impl LlmProvider {
    /// Public API root for the provider
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    /// Model used when none is configured
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Gemini => "gemini-1.5-flash",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Configuration for the inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: LlmProvider,

    /// Override for the provider's API root
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key sent to the provider
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Override for the provider's default model
    #[serde(default)]
    pub default_model: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-p (nucleus) sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

const fn default_max_tokens() -> u32 {
    150
}

const fn default_temperature() -> f32 {
    1.0
}

const fn default_top_p() -> f32 {
    1.0
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: None,
            api_key: None,
            default_model: None,
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl InferenceConfig {
    /// API root with any trailing slash removed
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Model name to use when a request does not name one
    pub fn resolved_model(&self) -> String {
        self.default_model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("inference timeout_ms must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("inference max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("inference temperature must be between 0.0 and 2.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.top_p) || self.top_p == 0.0 {
            return Err("inference top_p must be in (0.0, 1.0]".to_string());
        }
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(format!("no API key configured for {}", self.provider));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> InferenceConfig {
        InferenceConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_match_reply_settings() {
        let config = InferenceConfig::default();
        assert_eq!(config.provider, LlmProvider::OpenAi);
        assert_eq!(config.max_tokens, 150);
        assert!((config.temperature - 1.0).abs() < f32::EPSILON);
        assert!((config.top_p - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn resolves_provider_defaults() {
        let config = InferenceConfig::default();
        assert_eq!(config.resolved_base_url(), "https://api.openai.com/v1");
        assert_eq!(config.resolved_model(), "gpt-3.5-turbo");

        let gemini = InferenceConfig {
            provider: LlmProvider::Gemini,
            ..Default::default()
        };
        assert_eq!(
            gemini.resolved_base_url(),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(gemini.resolved_model(), "gemini-1.5-flash");
    }

    #[test]
    fn base_url_override_is_trimmed() {
        let config = InferenceConfig {
            base_url: Some("http://localhost:8080/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_base_url(), "http://localhost:8080");
    }

    #[test]
    fn validate_accepts_defaults_with_key() {
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn validate_requires_api_key() {
        let err = InferenceConfig::default().validate().unwrap_err();
        assert!(err.contains("API key"));
    }

    #[test]
    fn validate_rejects_out_of_range_sampling() {
        let config = InferenceConfig {
            temperature: 3.0,
            ..with_key()
        };
        assert!(config.validate().is_err());

        let config = InferenceConfig {
            top_p: 0.0,
            ..with_key()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserialize_from_toml() {
        let toml_str = r#"
            provider = "gemini"
            default_model = "gemini-1.5-pro"
            max_tokens = 200
        "#;
        let config: InferenceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.resolved_model(), "gemini-1.5-pro");
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.timeout_ms, 30000);
    }
}
