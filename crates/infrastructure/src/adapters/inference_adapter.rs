//! Inference adapter - Implements `InferencePort` using ai_core engines
//!
//! Works with every engine `ai_core::create_engine` can build (OpenAI chat
//! completions and Gemini). Retryable provider failures are retried with
//! backoff before they surface.

use std::{sync::Arc, time::Instant};

use ai_core::{InferenceConfig, InferenceEngine, InferenceError, InferenceRequest};
use application::{
    error::ApplicationError,
    ports::{GenerationOptions, InferencePort, InferenceResult},
};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::retry::{RetryConfig, retry};

/// Adapter from the application's inference port to an ai_core engine
pub struct InferenceAdapter {
    engine: Arc<dyn InferenceEngine>,
    retry: RetryConfig,
}

impl std::fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceAdapter")
            .field("model", &self.engine.default_model())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl InferenceAdapter {
    /// Wrap an existing engine
    pub fn new(engine: Arc<dyn InferenceEngine>, retry: RetryConfig) -> Self {
        Self { engine, retry }
    }

    /// Build the engine selected by `config.provider`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` when the configuration is
    /// invalid, including a missing API key.
    pub fn from_config(config: InferenceConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let engine = ai_core::create_engine(config).map_err(map_inference_error)?;
        Ok(Self::new(engine, retry))
    }
}

/// Convert ai_core error to application error
pub fn map_inference_error(e: InferenceError) -> ApplicationError {
    match e {
        InferenceError::RateLimited => ApplicationError::RateLimited,
        InferenceError::Timeout(ms) => ApplicationError::Timeout(ms.div_ceil(1000)),
        InferenceError::InvalidResponse(msg) => ApplicationError::MalformedProviderResponse(msg),
        InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::GenerationFailed(other.to_string()),
    }
}

#[async_trait]
impl InferencePort for InferenceAdapter {
    #[instrument(skip(self, system_prompt, message), fields(message_len = message.len(), model = %self.engine.default_model()))]
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
        options: GenerationOptions,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();

        let mut request = InferenceRequest::with_system(system_prompt, message);
        if let Some(temperature) = options.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = options.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let engine = &self.engine;
        let request = &request;
        let response = retry(&self.retry, move || engine.generate(request.clone()))
            .await
            .map_err(map_inference_error)?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            model = %response.model,
            tokens = ?response.usage.as_ref().map(|u| u.total_tokens),
            finish_reason = ?response.finish_reason,
            latency_ms = latency_ms,
            "Inference completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    async fn is_healthy(&self) -> bool {
        match self.engine.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Inference health check failed");
                false
            },
        }
    }

    fn current_model(&self) -> String {
        self.engine.default_model().to_string()
    }
}
