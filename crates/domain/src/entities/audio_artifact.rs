//! Synthesized audio artifact

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ArtifactId;

/// A generated speech file owned by the artifact store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioArtifact {
    pub id: ArtifactId,
    pub size_bytes: usize,
    pub created_at: DateTime<Utc>,
}

impl AudioArtifact {
    /// Describe a freshly written artifact
    pub fn new(id: ArtifactId, size_bytes: usize) -> Self {
        Self {
            id,
            size_bytes,
            created_at: Utc::now(),
        }
    }

    /// Filename used on disk and in the retrieval URL
    pub fn filename(&self) -> String {
        self.id.filename()
    }

    /// Retrieval URL below `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/audio/{}", base_url.trim_end_matches('/'), self.filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let artifact = AudioArtifact::new(ArtifactId::new(), 44);
        let with_slash = artifact.url("http://127.0.0.1:5000/");
        let without = artifact.url("http://127.0.0.1:5000");
        assert_eq!(with_slash, without);
        assert_eq!(
            without,
            format!("http://127.0.0.1:5000/audio/{}", artifact.filename())
        );
    }

    #[test]
    fn relative_base_yields_path() {
        let artifact = AudioArtifact::new(ArtifactId::new(), 44);
        assert_eq!(
            artifact.url(""),
            format!("/audio/{}", artifact.filename())
        );
    }
}
