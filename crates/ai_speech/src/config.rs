//! Configuration for speech processing

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transcriber::PollPolicy;

/// Configuration for speech processing services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// AWS region override (falls back to the default provider chain)
    #[serde(default)]
    pub aws_region: Option<String>,

    /// Custom AWS endpoint (e.g. a local emulator)
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,

    /// S3 bucket used to stage recordings for transcription
    ///
    /// Transcription is unavailable when unset.
    #[serde(default)]
    pub staging_bucket: Option<String>,

    /// Key prefix for staged recordings
    #[serde(default = "default_staging_prefix")]
    pub staging_prefix: String,

    /// Transcription language code (BCP-47)
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// First delay between job status polls in milliseconds
    #[serde(default = "default_poll_initial_interval_ms")]
    pub poll_initial_interval_ms: u64,

    /// Upper bound for the delay between polls in milliseconds
    #[serde(default = "default_poll_max_interval_ms")]
    pub poll_max_interval_ms: u64,

    /// Growth factor of the poll delay
    #[serde(default = "default_poll_multiplier")]
    pub poll_multiplier: f64,

    /// Overall limit for one transcription in milliseconds
    #[serde(default = "default_transcription_timeout_ms")]
    pub transcription_timeout_ms: u64,

    /// Speech synthesis provider
    #[serde(default)]
    pub tts_provider: TtsProvider,

    /// Polly voice id
    #[serde(default = "default_polly_voice_id")]
    pub polly_voice_id: String,

    /// Polly engine (`standard`, `neural`)
    #[serde(default = "default_polly_engine")]
    pub polly_engine: String,

    /// PCM sample rate requested from Polly
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// OpenAI API key (for the OpenAI TTS provider)
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// OpenAI text-to-speech model
    #[serde(default = "default_tts_model")]
    pub openai_tts_model: String,

    /// OpenAI voice
    #[serde(default = "default_openai_voice")]
    pub openai_voice: String,

    /// HTTP request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Speech synthesis provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// AWS Polly
    #[default]
    Polly,
    /// OpenAI TTS
    OpenAi,
}

fn default_staging_prefix() -> String {
    "solace/uploads/".to_string()
}

fn default_language_code() -> String {
    "en-US".to_string()
}

const fn default_poll_initial_interval_ms() -> u64 {
    1000
}

const fn default_poll_max_interval_ms() -> u64 {
    8000
}

const fn default_poll_multiplier() -> f64 {
    2.0
}

const fn default_transcription_timeout_ms() -> u64 {
    120_000 // 2 minutes
}

fn default_polly_voice_id() -> String {
    "Joanna".to_string()
}

fn default_polly_engine() -> String {
    "neural".to_string()
}

const fn default_sample_rate() -> u32 {
    16000
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_openai_voice() -> String {
    "nova".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            aws_region: None,
            aws_endpoint_url: None,
            staging_bucket: None,
            staging_prefix: default_staging_prefix(),
            language_code: default_language_code(),
            poll_initial_interval_ms: default_poll_initial_interval_ms(),
            poll_max_interval_ms: default_poll_max_interval_ms(),
            poll_multiplier: default_poll_multiplier(),
            transcription_timeout_ms: default_transcription_timeout_ms(),
            tts_provider: TtsProvider::default(),
            polly_voice_id: default_polly_voice_id(),
            polly_engine: default_polly_engine(),
            sample_rate: default_sample_rate(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            openai_tts_model: default_tts_model(),
            openai_voice: default_openai_voice(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            staging_bucket: Some("test-bucket".to_string()),
            openai_api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    /// Whether recordings can be transcribed with this configuration
    pub fn transcription_enabled(&self) -> bool {
        self.staging_bucket.as_deref().is_some_and(|b| !b.is_empty())
    }

    /// Backoff schedule for transcription job polling
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_interval: Duration::from_millis(self.poll_initial_interval_ms),
            max_interval: Duration::from_millis(self.poll_max_interval_ms),
            multiplier: self.poll_multiplier,
            timeout: Duration::from_millis(self.transcription_timeout_ms),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tts_provider == TtsProvider::OpenAi
            && self.openai_api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err("OpenAI API key is required for the OpenAI TTS provider".to_string());
        }

        if self.tts_provider == TtsProvider::Polly && !matches!(self.sample_rate, 8000 | 16000) {
            return Err(format!(
                "Polly PCM sample rate must be 8000 or 16000, got {}",
                self.sample_rate
            ));
        }

        if self.poll_initial_interval_ms == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }

        if self.poll_max_interval_ms < self.poll_initial_interval_ms {
            return Err("Max poll interval must not be below the initial interval".to_string());
        }

        if self.poll_multiplier < 1.0 {
            return Err(format!(
                "Poll multiplier must be at least 1.0, got {}",
                self.poll_multiplier
            ));
        }

        if self.transcription_timeout_ms == 0 || self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.language_code.trim().is_empty() {
            return Err("Language code must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = SpeechConfig::default();

        assert!(config.staging_bucket.is_none());
        assert!(!config.transcription_enabled());
        assert_eq!(config.language_code, "en-US");
        assert_eq!(config.tts_provider, TtsProvider::Polly);
        assert_eq!(config.polly_voice_id, "Joanna");
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.transcription_timeout_ms, 120_000);
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SpeechConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_enables_transcription() {
        assert!(SpeechConfig::test().transcription_enabled());
    }

    #[test]
    fn openai_tts_requires_key() {
        let config = SpeechConfig {
            tts_provider: TtsProvider::OpenAi,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SpeechConfig {
            tts_provider: TtsProvider::OpenAi,
            ..SpeechConfig::test()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unsupported_polly_rate() {
        let mut config = SpeechConfig::test();
        config.sample_rate = 22050;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_shrinking_backoff() {
        let mut config = SpeechConfig::test();
        config.poll_multiplier = 0.5;
        assert!(config.validate().is_err());

        let mut config = SpeechConfig::test();
        config.poll_max_interval_ms = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_fails_with_zero_timeout() {
        let mut config = SpeechConfig::test();
        config.transcription_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn poll_policy_mirrors_config() {
        let policy = SpeechConfig::default().poll_policy();
        assert_eq!(policy.initial_interval, Duration::from_secs(1));
        assert_eq!(policy.max_interval, Duration::from_secs(8));
        assert_eq!(policy.timeout, Duration::from_secs(120));
    }

    #[test]
    fn tts_provider_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TtsProvider::Polly).unwrap(),
            "\"polly\""
        );
        assert_eq!(
            serde_json::to_string(&TtsProvider::OpenAi).unwrap(),
            "\"openai\""
        );
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml = r#"
            aws_region = "eu-west-1"
            staging_bucket = "solace-audio"
            language_code = "en-GB"
            tts_provider = "openai"
            openai_api_key = "sk-test"
            openai_voice = "alloy"
            transcription_timeout_ms = 60000
        "#;

        let config: SpeechConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.aws_region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.staging_bucket.as_deref(), Some("solace-audio"));
        assert_eq!(config.language_code, "en-GB");
        assert_eq!(config.tts_provider, TtsProvider::OpenAi);
        assert_eq!(config.openai_voice, "alloy");
        assert_eq!(config.transcription_timeout_ms, 60000);
        assert_eq!(config.staging_prefix, "solace/uploads/");
    }
}
