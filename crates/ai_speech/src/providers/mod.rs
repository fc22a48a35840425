//! Speech processing provider implementations
//!
//! Contains concrete implementations of the staging, transcription job and
//! `TextToSpeech` ports.

pub mod openai;
pub mod polly;
pub mod s3;
pub mod transcribe;

pub use openai::OpenAiSpeechProvider;
pub use polly::PollySpeechProvider;
pub use s3::S3AudioStaging;
pub use transcribe::{AwsTranscribeJobs, TranscriptFetcher};
