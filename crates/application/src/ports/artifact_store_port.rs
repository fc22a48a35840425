//! Artifact store port - Lifecycle of generated audio files

use async_trait::async_trait;
use domain::{ArtifactId, AudioArtifact};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for storing generated audio until the session ends
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// Persist a WAV file under a fresh id and register it for cleanup
    async fn save(&self, wav: Vec<u8>) -> Result<AudioArtifact, ApplicationError>;

    /// Read an artifact back
    ///
    /// Returns `ApplicationError::NotFound` once the file is gone.
    async fn read(&self, id: &ArtifactId) -> Result<Vec<u8>, ApplicationError>;

    /// Delete every registered artifact, returning the removed filenames
    ///
    /// Files that already vanished still count as deleted. A second call
    /// returns an empty list.
    async fn delete_all(&self) -> Result<Vec<String>, ApplicationError>;

    /// Filenames currently registered
    fn owned(&self) -> Vec<String>;
}
