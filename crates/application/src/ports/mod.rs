//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod artifact_store_port;
mod inference_port;
mod speech_synthesis_port;
mod transcription_port;

pub use artifact_store_port::ArtifactStorePort;
#[cfg(test)]
pub use artifact_store_port::MockArtifactStorePort;
pub use inference_port::{GenerationOptions, InferencePort, InferenceResult};
#[cfg(test)]
pub use inference_port::MockInferencePort;
pub use speech_synthesis_port::SpeechSynthesisPort;
#[cfg(test)]
pub use speech_synthesis_port::MockSpeechSynthesisPort;
pub use transcription_port::TranscriptionPort;
#[cfg(test)]
pub use transcription_port::MockTranscriptionPort;
