//! Outgoing chat response

use serde::{Deserialize, Serialize};

use crate::value_objects::Sentiment;

/// Result of one successfully handled chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated reply
    pub reply_text: String,
    /// Retrieval URL of the synthesized reply
    pub audio_url: Option<String>,
    /// Transcript of the user's recording, for audio requests
    pub transcribed_text: Option<String>,
    /// Detected sentiment of the user's message
    pub sentiment: Option<Sentiment>,
}

impl ChatResponse {
    /// Create a response carrying only reply text
    pub fn new(reply_text: impl Into<String>) -> Self {
        Self {
            reply_text: reply_text.into(),
            audio_url: None,
            transcribed_text: None,
            sentiment: None,
        }
    }

    /// Attach the audio retrieval URL
    #[must_use]
    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    /// Attach the echoed transcript
    #[must_use]
    pub fn with_transcribed_text(mut self, text: impl Into<String>) -> Self {
        self.transcribed_text = Some(text.into());
        self
    }

    /// Attach a sentiment, if one was detected
    #[must_use]
    pub fn with_sentiment(mut self, sentiment: Option<Sentiment>) -> Self {
        self.sentiment = sentiment;
        self
    }
}
