//! Moderation verdict

use serde::{Deserialize, Serialize};

/// Outcome of checking text against the blocklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub blocked: bool,
    /// The first blocklist term found in the text
    pub matched_term: Option<String>,
}

impl ModerationVerdict {
    /// Verdict for text that passed
    pub const fn allowed() -> Self {
        Self {
            blocked: false,
            matched_term: None,
        }
    }

    /// Verdict for text containing `term`
    pub fn blocked(term: impl Into<String>) -> Self {
        Self {
            blocked: true,
            matched_term: Some(term.into()),
        }
    }

    pub const fn is_allowed(&self) -> bool {
        !self.blocked
    }
}
