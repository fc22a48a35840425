//! Transcription adapter - Implements `TranscriptionPort` using ai_speech
//!
//! Recordings are staged in S3 and transcribed by an AWS Transcribe batch
//! job. Without a staging bucket the adapter is built disabled and every
//! call fails, which the session degrades to the fallback transcript.

use std::{sync::Arc, time::Duration};

use ai_speech::{
    AudioData, AwsTranscribeJobs, JobTranscriber, S3AudioStaging, SpeechConfig, SpeechError,
    SpeechToText, TranscriptFetcher,
};
use application::{error::ApplicationError, ports::TranscriptionPort};
use async_trait::async_trait;
use aws_config::SdkConfig;
use domain::TranscriptResult;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::map_speech_error;

/// Adapter from the application's transcription port to a speech-to-text backend
pub struct TranscriptionAdapter {
    stt: Option<Arc<dyn SpeechToText>>,
}

impl std::fmt::Debug for TranscriptionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionAdapter")
            .field("backend", &self.stt.as_ref().map(|s| s.model_name().to_string()))
            .finish()
    }
}

impl TranscriptionAdapter {
    /// Wrap an existing speech-to-text backend
    pub fn new(stt: Arc<dyn SpeechToText>) -> Self {
        Self { stt: Some(stt) }
    }

    /// An adapter that rejects every recording
    pub const fn disabled() -> Self {
        Self { stt: None }
    }

    /// Build the S3 + Transcribe backend, or a disabled adapter when no
    /// staging bucket is configured
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the transcript HTTP
    /// client cannot be built.
    pub fn from_config(config: &SpeechConfig, sdk: &SdkConfig) -> Result<Self, ApplicationError> {
        let Some(bucket) = config.staging_bucket.as_deref() else {
            return Ok(Self::disabled());
        };

        let fetcher = TranscriptFetcher::new(Duration::from_millis(config.timeout_ms))
            .map_err(|e| map_speech_error(e, ApplicationError::TranscriptionFailed))?;
        let staging = Arc::new(S3AudioStaging::new(sdk, bucket));
        let jobs = Arc::new(AwsTranscribeJobs::new(sdk, fetcher));
        let transcriber = JobTranscriber::new(
            staging,
            jobs,
            config.poll_policy(),
            config.language_code.clone(),
        )
        .with_key_prefix(config.staging_prefix.clone());

        Ok(Self::new(Arc::new(transcriber)))
    }

    /// Whether a backend is wired in
    pub const fn is_enabled(&self) -> bool {
        self.stt.is_some()
    }
}

#[async_trait]
impl TranscriptionPort for TranscriptionAdapter {
    #[instrument(skip(self, audio, cancel), fields(audio_bytes = audio.len()))]
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        cancel: CancellationToken,
    ) -> Result<TranscriptResult, ApplicationError> {
        let Some(stt) = &self.stt else {
            return Err(ApplicationError::TranscriptionFailed(
                "transcription is not configured".to_string(),
            ));
        };

        let audio = AudioData::sniffed(audio);
        if audio.is_empty() {
            return Err(map_speech_error(
                SpeechError::InvalidAudio("recording is empty".to_string()),
                ApplicationError::TranscriptionFailed,
            ));
        }

        let transcription = stt
            .transcribe(audio, cancel)
            .await
            .map_err(|e| map_speech_error(e, ApplicationError::TranscriptionFailed))?;

        debug!(
            job_name = ?transcription.job_name,
            text_len = transcription.text.len(),
            "Transcription completed"
        );

        Ok(TranscriptResult::completed(transcription.text))
    }
}
