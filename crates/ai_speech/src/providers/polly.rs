//! AWS Polly text-to-speech provider
//!
//! Requests raw PCM (signed 16-bit little-endian, mono) at the configured
//! sample rate so the result can be wrapped without transcoding.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_polly::Client;
use aws_sdk_polly::types::{Engine, OutputFormat, VoiceId};
use tracing::{debug, instrument};

use crate::aws::map_sdk_error;
use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::PcmAudio;

/// Polly rejects plain-text input longer than this
pub const MAX_TEXT_CHARS: usize = 3000;

/// Speech synthesis with AWS Polly
#[derive(Debug, Clone)]
pub struct PollySpeechProvider {
    client: Client,
    voice_id: String,
    engine: String,
    sample_rate: u32,
}

impl PollySpeechProvider {
    /// Create a provider from the shared SDK configuration
    pub fn new(sdk_config: &SdkConfig, config: &SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        Ok(Self {
            client: Client::new(sdk_config),
            voice_id: config.polly_voice_id.clone(),
            engine: config.polly_engine.clone(),
            sample_rate: config.sample_rate,
        })
    }
}

#[async_trait]
impl TextToSpeech for PollySpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %self.voice_id))]
    async fn synthesize_pcm(&self, text: &str) -> Result<PcmAudio, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {chars} characters exceeds {MAX_TEXT_CHARS} limit"
            )));
        }

        let output = self
            .client
            .synthesize_speech()
            .text(text)
            .voice_id(VoiceId::from(self.voice_id.as_str()))
            .engine(Engine::from(self.engine.as_str()))
            .output_format(OutputFormat::Pcm)
            .sample_rate(self.sample_rate.to_string())
            .send()
            .await
            .map_err(|e| map_sdk_error(&e, SpeechError::SynthesisFailed))?;

        let audio = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(format!("Failed to read audio: {e}")))?
            .into_bytes();

        debug!(audio_size = audio.len(), "Speech synthesis complete");

        Ok(PcmAudio::new(audio.to_vec(), self.sample_rate))
    }

    fn voice(&self) -> &str {
        &self.voice_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::{BehaviorVersion, Region};

    fn sdk_config() -> SdkConfig {
        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build()
    }

    #[test]
    fn uses_configured_voice() {
        let config = SpeechConfig {
            polly_voice_id: "Matthew".to_string(),
            ..SpeechConfig::test()
        };
        let provider = PollySpeechProvider::new(&sdk_config(), &config).unwrap();
        assert_eq!(provider.voice(), "Matthew");
        assert_eq!(provider.sample_rate, 16000);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SpeechConfig {
            sample_rate: 44100,
            ..SpeechConfig::test()
        };
        assert!(PollySpeechProvider::new(&sdk_config(), &config).is_err());
    }

    #[tokio::test]
    async fn empty_text_fails_without_calling_aws() {
        let provider = PollySpeechProvider::new(&sdk_config(), &SpeechConfig::test()).unwrap();
        let err = provider.synthesize_pcm("  ").await.unwrap_err();
        assert!(matches!(err, SpeechError::SynthesisFailed(_)));
    }

    #[tokio::test]
    async fn overlong_text_fails_without_calling_aws() {
        let provider = PollySpeechProvider::new(&sdk_config(), &SpeechConfig::test()).unwrap();
        let text = "a".repeat(MAX_TEXT_CHARS + 1);
        let err = provider.synthesize_pcm(&text).await.unwrap_err();
        assert!(matches!(err, SpeechError::SynthesisFailed(_)));
    }
}
