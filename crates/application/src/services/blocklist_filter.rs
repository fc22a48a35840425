//! Blocklist filter for screening user text before generation
//!
//! Terms are matched as case-insensitive substrings with a single
//! Aho-Corasick automaton built once at startup. The filter is immutable
//! and meant to be shared behind an `Arc`.

use aho_corasick::{AhoCorasick, MatchKind};
use domain::ModerationVerdict;
use tracing::debug;

use crate::error::ApplicationError;

/// Immutable set of disallowed terms
#[derive(Debug, Clone, Default)]
pub struct BlocklistFilter {
    terms: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl BlocklistFilter {
    /// A filter that allows everything
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a filter from raw terms
    ///
    /// Terms are trimmed and lowercased; blank and duplicate entries are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the automaton cannot be
    /// built (e.g. the term set exceeds the matcher's size limits).
    pub fn from_terms<I, S>(terms: I) -> Result<Self, ApplicationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        normalized.sort_unstable();
        normalized.dedup();

        if normalized.is_empty() {
            return Ok(Self::empty());
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostFirst)
            .build(&normalized)
            .map_err(|e| {
                ApplicationError::Configuration(format!("Failed to build blocklist matcher: {e}"))
            })?;

        debug!(terms = normalized.len(), "Blocklist filter built");

        Ok(Self {
            terms: normalized,
            matcher: Some(matcher),
        })
    }

    /// Screen `text` against the blocklist
    #[must_use]
    pub fn check(&self, text: &str) -> ModerationVerdict {
        let Some(matcher) = &self.matcher else {
            return ModerationVerdict::allowed();
        };

        let haystack = text.to_lowercase();
        matcher
            .find(&haystack)
            .map_or_else(ModerationVerdict::allowed, |m| {
                ModerationVerdict::blocked(self.terms[m.pattern().as_usize()].clone())
            })
    }

    /// Whether `text` contains any blocklisted term
    #[must_use]
    pub fn is_blocked(&self, text: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|m| m.is_match(&text.to_lowercase()))
    }

    /// Number of distinct terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the filter blocks nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Normalized terms
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
