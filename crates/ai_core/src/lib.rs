//! AI Core - Language-model provider clients
//!
//! Provides a provider-neutral [`InferenceEngine`] port with two HTTP
//! implementations:
//!
//! - [`OpenAiChatEngine`] for OpenAI-compatible `/chat/completions` APIs
//! - [`GeminiEngine`] for Google's `generateContent` API
//!
//! [`create_engine`] picks the implementation from [`InferenceConfig`].

pub mod config;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod ports;
pub mod selector;

pub use config::{InferenceConfig, LlmProvider};
pub use error::InferenceError;
pub use gemini::GeminiEngine;
pub use openai::OpenAiChatEngine;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
pub use selector::create_engine;
