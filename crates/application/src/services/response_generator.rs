//! Response generator - empathetic replies from the language model

use std::{fmt, sync::Arc};

use domain::Sentiment;
use tracing::{debug, instrument};

use crate::{
    error::ApplicationError,
    ports::{GenerationOptions, InferencePort},
};

/// Persona every reply is generated under
pub const THERAPIST_PERSONA: &str = "You are a compassionate AI therapist. \
Listen carefully, validate the user's feelings and answer in a few warm, \
concise sentences. Do not diagnose or prescribe medication. If the user \
mentions self-harm or being in danger, gently encourage them to contact \
local emergency services or a crisis line.";

/// Build the system instruction, steering tone by the detected sentiment
#[must_use]
pub fn system_prompt(sentiment: Option<&Sentiment>) -> String {
    match sentiment {
        Some(sentiment) => {
            let tone = sentiment.tone().unwrap_or("warm and balanced");
            format!(
                "{THERAPIST_PERSONA}\nThe user seems to be feeling {}. Respond in a {tone} way.",
                sentiment.as_str()
            )
        },
        None => THERAPIST_PERSONA.to_string(),
    }
}

/// Generates therapist replies through an [`InferencePort`]
pub struct ResponseGenerator {
    inference: Arc<dyn InferencePort>,
    options: GenerationOptions,
}

impl fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseGenerator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ResponseGenerator {
    /// Create a generator using the provider's sampling defaults
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self {
            inference,
            options: GenerationOptions::default(),
        }
    }

    /// Override sampling options for every reply
    #[must_use]
    pub const fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Generate a reply to `text`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::GenerationFailed` when the model answers
    /// with nothing but whitespace, or the provider's error.
    #[instrument(skip(self, text), fields(text_len = text.len(), sentiment = ?sentiment.map(Sentiment::as_str)))]
    pub async fn generate(
        &self,
        text: &str,
        sentiment: Option<&Sentiment>,
    ) -> Result<String, ApplicationError> {
        let prompt = system_prompt(sentiment);
        let result = self
            .inference
            .generate_with_system(&prompt, text, self.options)
            .await?;

        let reply = result.content.trim();
        if reply.is_empty() {
            return Err(ApplicationError::GenerationFailed(
                "model returned an empty reply".to_string(),
            ));
        }

        debug!(
            model = %result.model,
            tokens = ?result.tokens_used,
            latency_ms = result.latency_ms,
            reply_len = reply.len(),
            "Reply generated"
        );

        Ok(reply.to_string())
    }
}
