//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod fs_artifact_store;
mod inference_adapter;
mod synthesis_adapter;
mod transcription_adapter;

use ai_speech::SpeechError;
use application::error::ApplicationError;

pub use fs_artifact_store::FsArtifactStore;
pub use inference_adapter::{InferenceAdapter, map_inference_error};
pub use synthesis_adapter::{SynthesisAdapter, build_tts};
pub use transcription_adapter::TranscriptionAdapter;

/// Convert a speech error to an application error
///
/// Errors without a dedicated application variant are wrapped with
/// `fallback`, which names the stage that failed.
pub fn map_speech_error(err: SpeechError, fallback: fn(String) -> ApplicationError) -> ApplicationError {
    match err {
        SpeechError::RateLimited => ApplicationError::RateLimited,
        SpeechError::Timeout(ms) => ApplicationError::Timeout(ms.div_ceil(1000)),
        SpeechError::Cancelled => ApplicationError::Cancelled,
        SpeechError::MalformedResponse(msg) => ApplicationError::MalformedProviderResponse(msg),
        SpeechError::Configuration(msg) => ApplicationError::Configuration(msg),
        other => fallback(other.to_string()),
    }
}
