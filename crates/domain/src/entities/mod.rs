//! Domain entities - Objects with identity and lifecycle

mod audio_artifact;
mod chat_request;
mod chat_response;
mod moderation;
mod session_state;
mod transcript;

pub use audio_artifact::AudioArtifact;
pub use chat_request::{ChatRequest, InputModality};
pub use chat_response::ChatResponse;
pub use moderation::ModerationVerdict;
pub use session_state::SessionState;
pub use transcript::{
    NO_SPEECH_TEXT, TRANSCRIPTION_FAILED_TEXT, TranscriptResult, TranscriptStatus,
};
