//! Identifier for generated audio artifacts

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DomainError;

/// File extension used for every synthesized artifact
pub const ARTIFACT_EXTENSION: &str = "wav";

/// A unique identifier for a synthesized audio file
///
/// Artifact files are named `<uuid>.wav`. Parsing a filename back into an
/// id is the only way the HTTP layer resolves files, so names that are not
/// of that exact shape (including anything containing path separators) are
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Create a new random artifact ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an artifact ID from an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an artifact ID from its bare UUID string
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::InvalidArtifactId(s.to_string()))
    }

    /// Parse an artifact ID from a `<uuid>.wav` filename
    pub fn from_filename(filename: &str) -> Result<Self, DomainError> {
        let stem = filename
            .strip_suffix(ARTIFACT_EXTENSION)
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(|| DomainError::InvalidArtifactId(filename.to_string()))?;

        // Only the hyphenated form is produced, reject braced/urn variants
        if stem.len() != 36 {
            return Err(DomainError::InvalidArtifactId(filename.to_string()));
        }

        Uuid::parse_str(stem)
            .map(Self)
            .map_err(|_| DomainError::InvalidArtifactId(filename.to_string()))
    }

    /// Filename of the artifact on disk and in retrieval URLs
    pub fn filename(&self) -> String {
        format!("{}.{ARTIFACT_EXTENSION}", self.0)
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ArtifactId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_artifact_id_is_unique() {
        let id1 = ArtifactId::new();
        let id2 = ArtifactId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn filename_has_wav_extension() {
        let id = ArtifactId::new();
        let name = id.filename();
        assert!(name.ends_with(".wav"));
        assert_eq!(name.len(), 40);
    }

    #[test]
    fn filename_roundtrips() {
        let id = ArtifactId::new();
        let parsed = ArtifactId::from_filename(&id.filename()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = ArtifactId::parse(&uuid.to_string()).unwrap();
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn rejects_wrong_extension() {
        let uuid = Uuid::new_v4();
        assert!(ArtifactId::from_filename(&format!("{uuid}.mp3")).is_err());
        assert!(ArtifactId::from_filename(&uuid.to_string()).is_err());
    }

    #[test]
    fn rejects_path_traversal() {
        assert!(ArtifactId::from_filename("../secret.wav").is_err());
        assert!(ArtifactId::from_filename("a/b.wav").is_err());
        assert!(ArtifactId::from_filename(".wav").is_err());
    }

    #[test]
    fn rejects_simple_uuid_form() {
        let simple = Uuid::new_v4().simple().to_string();
        assert!(ArtifactId::from_filename(&format!("{simple}.wav")).is_err());
    }

    #[test]
    fn display_is_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = ArtifactId::from(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
