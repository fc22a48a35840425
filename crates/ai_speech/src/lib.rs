//! AI Speech - Speech-to-Text and Text-to-Speech providers
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Transcribe a recording to text (STT)
//! - `TextToSpeech` - Synthesize raw PCM speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//! - `transcriber` composes an [`AudioStaging`] and a [`TranscriptionJobs`]
//!   provider into a [`SpeechToText`] that submits a batch job and polls it
//!   with exponential backoff, bounded by a timeout and cancellable
//! - `wav` wraps raw PCM into a WAV container
//!
//! # Supported Providers
//!
//! - AWS S3 (staging) + AWS Transcribe (STT)
//! - AWS Polly and OpenAI TTS (TTS)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{JobTranscriber, SpeechToText, AudioData, AudioFormat};
//!
//! let stt = JobTranscriber::new(staging, jobs, config.poll_policy(), config.language_code.clone());
//! let transcription = stt.transcribe(AudioData::sniffed(bytes), CancellationToken::new()).await?;
//! println!("Transcribed: {}", transcription.text);
//!
//! let pcm = tts.synthesize_pcm("Hello, world!").await?;
//! let wav = ai_speech::wav::pcm_to_wav(&pcm)?;
//! ```

pub mod aws;
pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod transcriber;
pub mod types;
pub mod wav;

pub use config::{SpeechConfig, TtsProvider};
pub use error::SpeechError;
pub use ports::{AudioStaging, SpeechToText, TextToSpeech, TranscriptionJobs};
pub use providers::openai::OpenAiSpeechProvider;
pub use providers::polly::PollySpeechProvider;
pub use providers::s3::S3AudioStaging;
pub use providers::transcribe::{AwsTranscribeJobs, TranscriptFetcher};
pub use transcriber::{JobTranscriber, PollPolicy};
pub use types::{
    AudioData, AudioFormat, JobState, PcmAudio, StagedAudio, TranscriptDocument, Transcription,
    TranscriptionJobRequest,
};
