//! Sentiment labels used to steer reply tone

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of labels the classifier is asked to choose from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Angry,
    Anxious,
    Excited,
    Depressed,
}

impl SentimentLabel {
    /// All labels in the order they are presented to the classifier
    pub const ALL: [Self; 7] = [
        Self::Positive,
        Self::Neutral,
        Self::Negative,
        Self::Angry,
        Self::Anxious,
        Self::Excited,
        Self::Depressed,
    ];

    /// Canonical label text
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Angry => "Angry",
            Self::Anxious => "Anxious",
            Self::Excited => "Excited",
            Self::Depressed => "Depressed",
        }
    }

    /// Tone the reply should take for this label
    pub const fn tone(&self) -> &'static str {
        match self {
            Self::Negative => "comforting",
            Self::Anxious | Self::Angry => "calming",
            Self::Depressed => "supportive",
            Self::Positive | Self::Excited => "uplifting",
            Self::Neutral => "warm and balanced",
        }
    }

    /// Case-insensitive lookup, ignoring surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sentiment as returned by the classifier
///
/// The classifier output is kept verbatim: it is not validated against
/// [`SentimentLabel`]. [`Sentiment::label`] recovers a known label when the
/// text matches one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sentiment(String);

impl Sentiment {
    /// Wrap raw classifier output
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The label text as produced
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The matching known label, if any
    pub fn label(&self) -> Option<SentimentLabel> {
        SentimentLabel::from_label(&self.0)
    }

    /// Tone guidance for the known label
    pub fn tone(&self) -> Option<&'static str> {
        self.label().map(|l| l.tone())
    }
}

impl From<SentimentLabel> for Sentiment {
    fn from(label: SentimentLabel) -> Self {
        Self(label.as_str().to_string())
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_labels() {
        assert_eq!(SentimentLabel::ALL.len(), 7);
    }

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(
            SentimentLabel::from_label("  anxious "),
            Some(SentimentLabel::Anxious)
        );
        assert_eq!(
            SentimentLabel::from_label("DEPRESSED"),
            Some(SentimentLabel::Depressed)
        );
        assert_eq!(SentimentLabel::from_label("melancholic"), None);
    }

    #[test]
    fn tones_follow_label_family() {
        assert_eq!(SentimentLabel::Negative.tone(), "comforting");
        assert_eq!(SentimentLabel::Anxious.tone(), "calming");
        assert_eq!(SentimentLabel::Depressed.tone(), "supportive");
        assert_eq!(SentimentLabel::Positive.tone(), "uplifting");
    }

    #[test]
    fn unknown_sentiment_is_kept_verbatim() {
        let s = Sentiment::new("Wistful");
        assert_eq!(s.as_str(), "Wistful");
        assert!(s.label().is_none());
        assert!(s.tone().is_none());
    }

    #[test]
    fn sentiment_serializes_as_plain_string() {
        let s = Sentiment::from(SentimentLabel::Excited);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"Excited\"");
    }
}
