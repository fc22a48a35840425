//! Transcription port - Interface for speech-to-text

use async_trait::async_trait;
use domain::TranscriptResult;
#[cfg(test)]
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::error::ApplicationError;

/// Port for turning a recording into text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe a recording
    ///
    /// A completed job without speech yields
    /// [`TranscriptResult::completed`] with the no-speech sentinel.
    /// Provider failures are returned as errors; the caller decides whether
    /// to degrade to [`TranscriptResult::failed`].
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        cancel: CancellationToken,
    ) -> Result<TranscriptResult, ApplicationError>;
}
