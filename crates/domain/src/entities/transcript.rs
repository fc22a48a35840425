//! Transcription result

use serde::{Deserialize, Serialize};

/// Text used when a recording was transcribed but contained no speech
pub const NO_SPEECH_TEXT: &str = "Could not extract speech from the audio.";

/// Text used when transcription failed outright
pub const TRANSCRIPTION_FAILED_TEXT: &str = "Sorry, I could not understand the audio.";

/// Terminal status of a transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    Completed,
    Failed,
}

/// Text recovered from a user's recording
///
/// Always carries usable text: an empty transcript becomes
/// [`NO_SPEECH_TEXT`] and a failed job becomes [`TRANSCRIPTION_FAILED_TEXT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub text: String,
    pub status: TranscriptStatus,
}

impl TranscriptResult {
    /// Completed transcript, trimmed
    pub fn completed(text: impl AsRef<str>) -> Self {
        let trimmed = text.as_ref().trim();
        let text = if trimmed.is_empty() {
            NO_SPEECH_TEXT.to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            text,
            status: TranscriptStatus::Completed,
        }
    }

    /// Fallback for a failed transcription
    pub fn failed() -> Self {
        Self {
            text: TRANSCRIPTION_FAILED_TEXT.to_string(),
            status: TranscriptStatus::Failed,
        }
    }

    pub const fn is_completed(&self) -> bool {
        matches!(self.status, TranscriptStatus::Completed)
    }

    /// Whether the text is one of the sentinel values
    pub fn is_sentinel(&self) -> bool {
        self.text == NO_SPEECH_TEXT || self.text == TRANSCRIPTION_FAILED_TEXT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_trims_text() {
        let t = TranscriptResult::completed("  I feel tired \n");
        assert_eq!(t.text, "I feel tired");
        assert!(t.is_completed());
        assert!(!t.is_sentinel());
    }

    #[test]
    fn empty_completed_maps_to_no_speech() {
        let t = TranscriptResult::completed("   ");
        assert_eq!(t.text, NO_SPEECH_TEXT);
        assert!(t.is_completed());
        assert!(t.is_sentinel());
    }

    #[test]
    fn failed_uses_fallback_text() {
        let t = TranscriptResult::failed();
        assert_eq!(t.text, TRANSCRIPTION_FAILED_TEXT);
        assert_eq!(t.status, TranscriptStatus::Failed);
        assert!(t.is_sentinel());
    }
}
