//! OpenAI Speech Provider
//!
//! Implements `TextToSpeech` using the OpenAI `/audio/speech` endpoint with
//! `response_format = "pcm"` (24 kHz, signed 16-bit little-endian, mono).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::PcmAudio;

/// Sample rate of OpenAI's raw PCM output
pub const OPENAI_PCM_SAMPLE_RATE: u32 = 24000;

/// OpenAI TTS has a 4096 character limit
const MAX_INPUT_CHARS: usize = 4096;

/// OpenAI speech provider implementing TTS
#[derive(Debug, Clone)]
pub struct OpenAiSpeechProvider {
    client: Client,
    config: SpeechConfig,
}

impl OpenAiSpeechProvider {
    /// Create a new OpenAI speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        if config.openai_api_key.as_deref().is_none_or(str::is_empty) {
            return Err(SpeechError::Configuration(
                "OpenAI API key is required for the OpenAI TTS provider".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Get the API key
    fn api_key(&self) -> &str {
        self.config.openai_api_key.as_deref().unwrap_or_default()
    }

    /// Build the TTS endpoint URL
    fn tts_url(&self) -> String {
        format!(
            "{}/audio/speech",
            self.config.openai_base_url.trim_end_matches('/')
        )
    }
}

/// OpenAI TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

#[async_trait]
impl TextToSpeech for OpenAiSpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %self.config.openai_voice))]
    async fn synthesize_pcm(&self, text: &str) -> Result<PcmAudio, SpeechError> {
        debug!("Synthesizing speech with OpenAI TTS");

        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {chars} characters exceeds {MAX_INPUT_CHARS} limit"
            )));
        }

        let request = TtsRequest {
            model: &self.config.openai_tts_model,
            input: text,
            voice: &self.config.openai_voice,
            response_format: "pcm",
        };

        let response = self
            .client
            .post(self.tts_url())
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, "OpenAI TTS request failed");

            if status.as_u16() == 429 {
                return Err(SpeechError::RateLimited);
            }

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(SpeechError::RateLimited),
                    _ if status.is_server_error() => {
                        Err(SpeechError::ServiceUnavailable(api_error.error.message))
                    },
                    _ => Err(SpeechError::SynthesisFailed(api_error.error.message)),
                };
            }

            return Err(if status.is_server_error() {
                SpeechError::ServiceUnavailable(format!("HTTP {status}: {error_body}"))
            } else {
                SpeechError::SynthesisFailed(format!("HTTP {status}: {error_body}"))
            });
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::MalformedResponse(format!("Failed to read audio: {e}")))?;

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");

        Ok(PcmAudio::new(audio_bytes.to_vec(), OPENAI_PCM_SAMPLE_RATE))
    }

    fn voice(&self) -> &str {
        &self.config.openai_voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TtsProvider;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(mock_server: &MockServer) -> OpenAiSpeechProvider {
        let config = SpeechConfig {
            tts_provider: TtsProvider::OpenAi,
            openai_api_key: Some("test-api-key".to_string()),
            openai_base_url: mock_server.uri(),
            ..Default::default()
        };
        OpenAiSpeechProvider::new(config).unwrap()
    }

    #[test]
    fn new_requires_api_key() {
        let config = SpeechConfig {
            tts_provider: TtsProvider::OpenAi,
            ..Default::default()
        };
        assert!(matches!(
            OpenAiSpeechProvider::new(config),
            Err(SpeechError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn synthesize_requests_pcm() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "tts-1",
                "voice": "nova",
                "response_format": "pcm",
                "input": "Take a slow breath."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1024]))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let pcm = provider.synthesize_pcm("Take a slow breath.").await.unwrap();

        assert_eq!(pcm.data.len(), 1024);
        assert_eq!(pcm.sample_rate, OPENAI_PCM_SAMPLE_RATE);
    }

    #[tokio::test]
    async fn synthesize_empty_text_fails() {
        let mock_server = MockServer::start().await;
        let provider = create_test_provider(&mock_server);

        let result = provider.synthesize_pcm("").await;

        assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
    }

    #[tokio::test]
    async fn synthesize_text_too_long_fails() {
        let mock_server = MockServer::start().await;
        let provider = create_test_provider(&mock_server);

        let long_text = "a".repeat(5000);
        let result = provider.synthesize_pcm(&long_text).await;

        assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
    }

    #[tokio::test]
    async fn synthesize_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "Rate limit exceeded",
                    "type": "rate_limit_error",
                    "code": "rate_limit_exceeded"
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let result = provider.synthesize_pcm("Hello").await;

        assert!(matches!(result, Err(SpeechError::RateLimited)));
    }

    #[tokio::test]
    async fn synthesize_server_error_is_retryable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let err = provider.synthesize_pcm("Hello").await.unwrap_err();

        assert!(matches!(err, SpeechError::ServiceUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn synthesize_bad_request_is_synthesis_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "Invalid voice", "type": "invalid_request_error", "code": null}
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let err = provider.synthesize_pcm("Hello").await.unwrap_err();

        match err {
            SpeechError::SynthesisFailed(msg) => assert_eq!(msg, "Invalid voice"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
