//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SpeechError;
use crate::types::{
    AudioData, JobState, PcmAudio, StagedAudio, TranscriptDocument, Transcription,
    TranscriptionJobRequest,
};

/// Port for Speech-to-Text (STT) implementations
///
/// Implementations of this trait convert audio data to text transcriptions.
///
/// # Example
///
/// ```ignore
/// use ai_speech::{SpeechToText, AudioData};
/// use tokio_util::sync::CancellationToken;
///
/// async fn transcribe_recording(
///     stt: &impl SpeechToText,
///     bytes: Vec<u8>,
/// ) -> Result<String, SpeechError> {
///     let transcription = stt.transcribe(AudioData::sniffed(bytes), CancellationToken::new()).await?;
///     Ok(transcription.text)
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - Audio data to transcribe
    /// * `cancel` - Cancelling the token abandons the wait for the provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Timeout` when the provider does not finish in
    /// time, `SpeechError::Cancelled` when the token fires and
    /// `SpeechError::TranscriptionFailed` when the provider reports failure.
    async fn transcribe(
        &self,
        audio: AudioData,
        cancel: CancellationToken,
    ) -> Result<Transcription, SpeechError>;

    /// Get the name of the current STT backend
    fn model_name(&self) -> &str;
}

/// Port for object storage that a transcription provider can read from
#[async_trait]
pub trait AudioStaging: Send + Sync {
    /// Upload a recording under `key`
    async fn stage(&self, key: &str, audio: &AudioData) -> Result<StagedAudio, SpeechError>;

    /// Remove a staged recording
    ///
    /// Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Result<(), SpeechError>;
}

/// Port for asynchronous batch transcription jobs
#[async_trait]
pub trait TranscriptionJobs: Send + Sync {
    /// Submit a job; returns once the provider accepted it
    async fn start_job(&self, request: &TranscriptionJobRequest) -> Result<(), SpeechError>;

    /// Current status of a job
    async fn job_state(&self, job_name: &str) -> Result<JobState, SpeechError>;

    /// Download and decode the transcript of a completed job
    async fn fetch_transcript(&self, transcript_uri: &str)
    -> Result<TranscriptDocument, SpeechError>;
}

/// Port for Text-to-Speech (TTS) implementations
///
/// Implementations of this trait convert text to raw PCM speech.
///
/// # Example
///
/// ```ignore
/// use ai_speech::{TextToSpeech, wav};
///
/// async fn create_voice_response(
///     tts: &impl TextToSpeech,
///     text: &str,
/// ) -> Result<Vec<u8>, SpeechError> {
///     let pcm = tts.synthesize_pcm(text).await?;
///     wav::pcm_to_wav(&pcm)
/// }
/// ```
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to signed 16-bit little-endian mono PCM
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize_pcm(&self, text: &str) -> Result<PcmAudio, SpeechError>;

    /// The fixed voice used for every synthesis
    fn voice(&self) -> &str;
}
