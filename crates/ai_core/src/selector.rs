//! Provider selection

use std::sync::Arc;

use crate::config::{InferenceConfig, LlmProvider};
use crate::error::InferenceError;
use crate::gemini::GeminiEngine;
use crate::openai::OpenAiChatEngine;
use crate::ports::InferenceEngine;

/// Build the engine for the configured provider
///
/// # Errors
///
/// Returns `InferenceError::Configuration` when the configuration does not
/// validate, e.g. when no API key is set.
pub fn create_engine(config: InferenceConfig) -> Result<Arc<dyn InferenceEngine>, InferenceError> {
    config.validate().map_err(InferenceError::Configuration)?;
    match config.provider {
        LlmProvider::OpenAi => Ok(Arc::new(OpenAiChatEngine::new(config)?)),
        LlmProvider::Gemini => Ok(Arc::new(GeminiEngine::new(config)?)),
    }
}
