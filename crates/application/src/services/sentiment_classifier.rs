//! Sentiment classifier - one-word emotional label for a message

use std::{fmt, sync::Arc};

use domain::{Sentiment, SentimentLabel};
use tracing::{debug, instrument};

use crate::{
    error::ApplicationError,
    ports::{GenerationOptions, InferencePort},
};

/// Token budget for the label answer
const CLASSIFICATION_MAX_TOKENS: u32 = 5;

/// Build the fixed classification instruction
#[must_use]
pub fn classification_prompt() -> String {
    let labels: Vec<&str> = SentimentLabel::ALL.iter().map(SentimentLabel::as_str).collect();
    format!(
        "Classify the emotional state expressed in the user's message. \
         Answer with exactly one word from this list: {}. \
         Do not add any other text.",
        labels.join(", ")
    )
}

/// Reduce a raw model answer to a bare label
///
/// Surrounding whitespace and quotes as well as trailing punctuation are
/// removed. The result is not checked against the known labels.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .trim()
        .to_string()
}

/// Classifies the sentiment of user messages through an [`InferencePort`]
pub struct SentimentClassifier {
    inference: Arc<dyn InferencePort>,
}

impl fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentClassifier").finish_non_exhaustive()
    }
}

impl SentimentClassifier {
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self { inference }
    }

    /// Classify `text`
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or
    /// `ApplicationError::MalformedProviderResponse` if the answer is empty.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn classify(&self, text: &str) -> Result<Sentiment, ApplicationError> {
        let result = self
            .inference
            .generate_with_system(
                &classification_prompt(),
                text,
                GenerationOptions::deterministic(CLASSIFICATION_MAX_TOKENS),
            )
            .await?;

        let label = normalize_label(&result.content);
        if label.is_empty() {
            return Err(ApplicationError::MalformedProviderResponse(
                "empty sentiment label".to_string(),
            ));
        }

        let sentiment = Sentiment::new(label);
        debug!(
            sentiment = %sentiment.as_str(),
            known = sentiment.label().is_some(),
            "Sentiment classified"
        );
        Ok(sentiment)
    }
}
