//! Incoming chat request

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Which input channel a request arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputModality {
    Text,
    Audio,
}

/// A single chat turn from the user
///
/// Exactly one modality is populated. Use [`ChatRequest::from_inputs`] to
/// build one from raw transport inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRequest {
    /// Typed message, never blank
    Text(String),
    /// Recorded audio, never empty
    Audio(Vec<u8>),
}

impl ChatRequest {
    /// Build a request from whatever the transport delivered
    ///
    /// Audio takes precedence over text when both are present. Empty audio
    /// and blank text count as absent.
    pub fn from_inputs(text: Option<String>, audio: Option<Vec<u8>>) -> Result<Self, DomainError> {
        if let Some(audio) = audio.filter(|a| !a.is_empty()) {
            return Ok(Self::Audio(audio));
        }

        match text {
            Some(text) if !text.trim().is_empty() => Ok(Self::Text(text)),
            _ => Err(DomainError::InputMissing),
        }
    }

    /// Create a text request
    pub fn text(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::from_inputs(Some(text.into()), None)
    }

    /// Create an audio request
    pub fn audio(audio: impl Into<Vec<u8>>) -> Result<Self, DomainError> {
        Self::from_inputs(None, Some(audio.into()))
    }

    /// The modality of this request
    pub const fn modality(&self) -> InputModality {
        match self {
            Self::Text(_) => InputModality::Text,
            Self::Audio(_) => InputModality::Audio,
        }
    }

    /// Check whether the request carries audio
    pub const fn is_audio(&self) -> bool {
        matches!(self, Self::Audio(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only() {
        let req = ChatRequest::from_inputs(Some("hello".to_string()), None).unwrap();
        assert_eq!(req, ChatRequest::Text("hello".to_string()));
        assert_eq!(req.modality(), InputModality::Text);
    }

    #[test]
    fn audio_wins_over_text() {
        let req =
            ChatRequest::from_inputs(Some("typed".to_string()), Some(vec![1, 2, 3])).unwrap();
        assert!(req.is_audio());
        assert_eq!(req, ChatRequest::Audio(vec![1, 2, 3]));
    }

    #[test]
    fn empty_audio_falls_back_to_text() {
        let req = ChatRequest::from_inputs(Some("typed".to_string()), Some(Vec::new())).unwrap();
        assert_eq!(req.modality(), InputModality::Text);
    }

    #[test]
    fn nothing_is_input_missing() {
        let err = ChatRequest::from_inputs(None, None).unwrap_err();
        assert!(matches!(err, DomainError::InputMissing));
    }

    #[test]
    fn blank_text_is_input_missing() {
        assert!(matches!(
            ChatRequest::text(""),
            Err(DomainError::InputMissing)
        ));
        assert!(matches!(
            ChatRequest::text("   \n\t"),
            Err(DomainError::InputMissing)
        ));
    }

    #[test]
    fn empty_audio_alone_is_input_missing() {
        assert!(matches!(
            ChatRequest::audio(Vec::new()),
            Err(DomainError::InputMissing)
        ));
    }
}
