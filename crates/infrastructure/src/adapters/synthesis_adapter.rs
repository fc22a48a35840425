//! Synthesis adapter - Implements `SpeechSynthesisPort` using ai_speech
//!
//! Providers return raw PCM, the adapter wraps it into a WAV container so
//! every artifact has the same on-disk format regardless of provider.

use std::sync::Arc;

use ai_speech::{
    OpenAiSpeechProvider, PollySpeechProvider, SpeechConfig, SpeechError, TextToSpeech,
    TtsProvider, wav,
};
use application::{error::ApplicationError, ports::SpeechSynthesisPort};
use async_trait::async_trait;
use aws_config::SdkConfig;
use tracing::{debug, info, instrument};

use super::map_speech_error;
use crate::retry::{RetryConfig, retry};

/// Build the speech provider selected by `config.tts_provider`
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if the provider rejects the
/// configuration (missing API key, invalid sample rate).
pub fn build_tts(
    config: &SpeechConfig,
    sdk: &SdkConfig,
) -> Result<Arc<dyn TextToSpeech>, ApplicationError> {
    let tts: Arc<dyn TextToSpeech> = match config.tts_provider {
        TtsProvider::Polly => Arc::new(
            PollySpeechProvider::new(sdk, config)
                .map_err(|e| map_speech_error(e, ApplicationError::SynthesisFailed))?,
        ),
        TtsProvider::OpenAi => Arc::new(
            OpenAiSpeechProvider::new(config.clone())
                .map_err(|e| map_speech_error(e, ApplicationError::SynthesisFailed))?,
        ),
    };
    info!(provider = ?config.tts_provider, voice = tts.voice(), "Speech synthesis ready");
    Ok(tts)
}

/// Adapter from the application's synthesis port to a text-to-speech provider
pub struct SynthesisAdapter {
    tts: Arc<dyn TextToSpeech>,
    retry: RetryConfig,
}

impl std::fmt::Debug for SynthesisAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisAdapter")
            .field("voice", &self.tts.voice())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SynthesisAdapter {
    pub fn new(tts: Arc<dyn TextToSpeech>, retry: RetryConfig) -> Self {
        Self { tts, retry }
    }
}

#[async_trait]
impl SpeechSynthesisPort for SynthesisAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = self.tts.voice()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ApplicationError> {
        if text.trim().is_empty() {
            return Err(ApplicationError::SynthesisFailed(
                "nothing to synthesize".to_string(),
            ));
        }

        let tts = &self.tts;
        let pcm = retry(&self.retry, move || tts.synthesize_pcm(text))
            .await
            .map_err(|e| map_speech_error(e, ApplicationError::SynthesisFailed))?;

        if pcm.data.is_empty() {
            return Err(map_speech_error(
                SpeechError::MalformedResponse("provider returned no audio".to_string()),
                ApplicationError::SynthesisFailed,
            ));
        }

        let wav = wav::pcm_to_wav(&pcm)
            .map_err(|e| map_speech_error(e, ApplicationError::SynthesisFailed))?;
        debug!(
            samples = pcm.sample_count(),
            sample_rate = pcm.sample_rate,
            wav_bytes = wav.len(),
            "Speech synthesized"
        );
        Ok(wav)
    }

    fn voice(&self) -> String {
        self.tts.voice().to_string()
    }
}
