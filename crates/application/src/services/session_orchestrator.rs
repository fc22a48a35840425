//! Session orchestrator - sequences one chat request through the pipeline
//!
//! ```text
//! input -> (transcribe) -> moderate -> classify + generate -> synthesize -> store
//! ```
//!
//! Every request walks the [`SessionState`] machine. Moderation always
//! runs before any model call, so blocked text never reaches a provider.

use std::{fmt, sync::Arc, time::Duration};

use domain::{ArtifactId, ChatRequest, ChatResponse, Sentiment, SessionState, TranscriptResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ArtifactStorePort, InferencePort, SpeechSynthesisPort, TranscriptionPort},
    services::{BlocklistFilter, ResponseGenerator, SentimentClassifier},
};

/// Per-request behaviour of the orchestrator
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Classify sentiment before generating the reply
    pub sentiment_enabled: bool,
    /// Upper bound for one request, transcription included
    pub request_timeout: Duration,
    /// Base of the audio retrieval URLs handed to clients
    pub public_base_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sentiment_enabled: true,
            request_timeout: Duration::from_secs(180),
            public_base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

/// Adapters the orchestrator drives
pub struct SessionPorts {
    pub inference: Arc<dyn InferencePort>,
    pub transcription: Arc<dyn TranscriptionPort>,
    pub synthesis: Arc<dyn SpeechSynthesisPort>,
    pub artifacts: Arc<dyn ArtifactStorePort>,
}

/// Tracks the state of a single request and logs each step
#[derive(Debug)]
struct RequestProgress {
    state: SessionState,
}

impl RequestProgress {
    const fn new() -> Self {
        Self {
            state: SessionState::ReceivingInput,
        }
    }

    fn advance(&mut self, next: SessionState) -> Result<(), ApplicationError> {
        let from = self.state;
        self.state = from.transition_to(next)?;
        debug!(from = %from, to = %next, "Session state transition");
        Ok(())
    }

    /// Record an adapter failure; the error is passed through
    fn fail(&mut self, err: ApplicationError) -> ApplicationError {
        if !self.state.is_terminal() {
            debug!(from = %self.state, to = %SessionState::Failed, "Session state transition");
            self.state = SessionState::Failed;
        }
        err
    }
}

/// Orchestrates chat requests and the artifact lifecycle of a session
pub struct SessionOrchestrator {
    filter: Arc<BlocklistFilter>,
    generator: ResponseGenerator,
    classifier: SentimentClassifier,
    transcription: Arc<dyn TranscriptionPort>,
    synthesis: Arc<dyn SpeechSynthesisPort>,
    artifacts: Arc<dyn ArtifactStorePort>,
    config: SessionConfig,
}

impl fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOrchestrator")
            .field("blocklist_terms", &self.filter.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionOrchestrator {
    /// Create an orchestrator
    pub fn new(filter: Arc<BlocklistFilter>, ports: SessionPorts, config: SessionConfig) -> Self {
        Self {
            filter,
            generator: ResponseGenerator::new(Arc::clone(&ports.inference)),
            classifier: SentimentClassifier::new(ports.inference),
            transcription: ports.transcription,
            synthesis: ports.synthesis,
            artifacts: ports.artifacts,
            config,
        }
    }

    /// Replace the reply generator (e.g. to override sampling options)
    #[must_use]
    pub fn with_generator(mut self, generator: ResponseGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Handle one chat request built from raw inputs
    ///
    /// Audio wins over text when both are present. The whole request is
    /// bounded by the configured timeout; `cancel` aborts a pending
    /// transcription.
    ///
    /// # Errors
    ///
    /// - `InputMissing` if neither input carries content
    /// - `ModerationBlocked` if the (transcribed) text hits the blocklist
    /// - `Timeout` if the request outlives the configured limit
    /// - generation, synthesis or storage errors from the adapters
    #[instrument(skip_all, fields(
        has_text = text.is_some(),
        audio_size = audio.as_ref().map_or(0, Vec::len)
    ))]
    pub async fn handle_chat(
        &self,
        text: Option<String>,
        audio: Option<Vec<u8>>,
        cancel: CancellationToken,
    ) -> Result<ChatResponse, ApplicationError> {
        let timeout = self.config.request_timeout;
        match tokio::time::timeout(timeout, self.run(text, audio, cancel.clone())).await {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                warn!(timeout_secs = timeout.as_secs(), "Chat request timed out");
                Err(ApplicationError::Timeout(timeout.as_secs()))
            },
        }
    }

    async fn run(
        &self,
        text: Option<String>,
        audio: Option<Vec<u8>>,
        cancel: CancellationToken,
    ) -> Result<ChatResponse, ApplicationError> {
        let mut progress = RequestProgress::new();

        let request = match ChatRequest::from_inputs(text, audio) {
            Ok(request) => request,
            Err(e) => {
                progress.advance(SessionState::Rejected)?;
                info!("Rejected request without input");
                return Err(e.into());
            },
        };

        let (text, transcribed_text) = match request {
            ChatRequest::Text(text) => {
                progress.advance(SessionState::TextProvided)?;
                (text, None)
            },
            ChatRequest::Audio(audio) => {
                progress.advance(SessionState::AudioProvided)?;
                progress.advance(SessionState::Transcribing)?;
                let transcript = self
                    .transcribe(audio, cancel)
                    .await
                    .map_err(|e| progress.fail(e))?;
                (transcript.text.clone(), Some(transcript.text))
            },
        };

        progress.advance(SessionState::Moderating)?;
        let verdict = self.filter.check(&text);
        if verdict.blocked {
            let term = verdict.matched_term.unwrap_or_default();
            progress.advance(SessionState::Rejected)?;
            info!(term = %term, "Rejected request with blocked content");
            return Err(ApplicationError::ModerationBlocked { term });
        }

        progress.advance(SessionState::GeneratingReply)?;
        let sentiment = if self.config.sentiment_enabled {
            match self.classifier.classify(&text).await {
                Ok(sentiment) => Some(sentiment),
                Err(e) => {
                    warn!(error = %e, "Sentiment classification failed, continuing without");
                    None
                },
            }
        } else {
            None
        };

        let reply = self
            .generator
            .generate(&text, sentiment.as_ref())
            .await
            .map_err(|e| progress.fail(e))?;

        // Replies go through the same filter as user input
        let reply_verdict = self.filter.check(&reply);
        if reply_verdict.blocked {
            let term = reply_verdict.matched_term.unwrap_or_default();
            warn!(term = %term, "Model reply contained blocked content");
            return Err(progress.fail(ApplicationError::GenerationFailed(
                "reply contained blocked content".to_string(),
            )));
        }

        progress.advance(SessionState::Synthesizing)?;
        let wav = self
            .synthesis
            .synthesize(&reply)
            .await
            .map_err(|e| progress.fail(e))?;
        let artifact = self
            .artifacts
            .save(wav)
            .await
            .map_err(|e| progress.fail(e))?;

        progress.advance(SessionState::Responding)?;
        let mut response = ChatResponse::new(reply)
            .with_audio_url(artifact.url(&self.config.public_base_url))
            .with_sentiment(sentiment);
        if let Some(transcribed) = transcribed_text {
            response = response.with_transcribed_text(transcribed);
        }

        progress.advance(SessionState::Responded)?;
        info!(
            artifact = %artifact.filename(),
            audio_size = artifact.size_bytes,
            sentiment = ?response.sentiment.as_ref().map(Sentiment::as_str),
            "Chat request answered"
        );

        Ok(response)
    }

    /// Transcribe a recording, degrading provider failures to the fallback text
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        cancel: CancellationToken,
    ) -> Result<TranscriptResult, ApplicationError> {
        match self.transcription.transcribe(audio, cancel).await {
            Ok(transcript) => {
                debug!(
                    sentinel = transcript.is_sentinel(),
                    text_len = transcript.text.len(),
                    "Transcription complete"
                );
                Ok(transcript)
            },
            Err(ApplicationError::Cancelled) => Err(ApplicationError::Cancelled),
            Err(e) => {
                warn!(error = %e, "Transcription failed, using fallback text");
                Ok(TranscriptResult::failed())
            },
        }
    }

    /// Read a stored artifact by its public filename
    ///
    /// # Errors
    ///
    /// `InvalidArtifact` for names that are not `<uuid>.wav`, `NotFound`
    /// once the file is gone.
    #[instrument(skip(self))]
    pub async fn read_artifact(&self, filename: &str) -> Result<Vec<u8>, ApplicationError> {
        let id = ArtifactId::from_filename(filename)?;
        self.artifacts.read(&id).await
    }

    /// End the session, deleting every artifact it produced
    ///
    /// Calling this again returns an empty list.
    #[instrument(skip(self))]
    pub async fn end_session(&self) -> Result<Vec<String>, ApplicationError> {
        let deleted = self.artifacts.delete_all().await?;
        info!(count = deleted.len(), "Session ended");
        Ok(deleted)
    }

    /// Filenames currently held for this session
    #[must_use]
    pub fn active_artifacts(&self) -> Vec<String> {
        self.artifacts.owned()
    }
}
