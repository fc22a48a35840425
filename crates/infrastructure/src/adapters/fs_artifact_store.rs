//! Filesystem artifact store - Implements `ArtifactStorePort` on a local directory
//!
//! Every synthesized WAV is written as `<uuid>.wav` below one directory and
//! registered in memory. Only registered files can be read back, so stray
//! files in the directory are never served.

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use application::{error::ApplicationError, ports::ArtifactStorePort};
use async_trait::async_trait;
use domain::{ArtifactId, AudioArtifact};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

/// Artifact store writing WAV files to a local directory
#[derive(Debug)]
pub struct FsArtifactStore {
    directory: PathBuf,
    owned: Mutex<HashSet<ArtifactId>>,
}

impl FsArtifactStore {
    /// Open the store, creating `directory` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the directory cannot be created.
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await.map_err(|e| {
            ApplicationError::Storage(format!(
                "Failed to create artifact directory {}: {e}",
                directory.display()
            ))
        })?;
        info!(directory = %directory.display(), "Artifact store ready");
        Ok(Self {
            directory,
            owned: Mutex::new(HashSet::new()),
        })
    }

    /// Directory holding the artifacts
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, id: &ArtifactId) -> PathBuf {
        self.directory.join(id.filename())
    }
}

#[async_trait]
impl ArtifactStorePort for FsArtifactStore {
    #[instrument(skip(self, wav), fields(wav_bytes = wav.len()))]
    async fn save(&self, wav: Vec<u8>) -> Result<AudioArtifact, ApplicationError> {
        let id = ArtifactId::new();
        let path = self.path_for(&id);
        // Write under a temporary name so readers never see a partial file
        let partial = path.with_extension("wav.partial");

        tokio::fs::write(&partial, &wav)
            .await
            .map_err(|e| ApplicationError::Storage(format!("Failed to write artifact: {e}")))?;
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(ApplicationError::Storage(format!(
                "Failed to finalize artifact: {e}"
            )));
        }

        self.owned.lock().insert(id);
        debug!(filename = %id.filename(), "Artifact saved");
        Ok(AudioArtifact::new(id, wav.len()))
    }

    async fn read(&self, id: &ArtifactId) -> Result<Vec<u8>, ApplicationError> {
        if !self.owned.lock().contains(id) {
            return Err(ApplicationError::NotFound(id.filename()));
        }

        match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(filename = %id.filename(), "Registered artifact vanished from disk");
                self.owned.lock().remove(id);
                Err(ApplicationError::NotFound(id.filename()))
            },
            Err(e) => Err(ApplicationError::Storage(format!(
                "Failed to read artifact: {e}"
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<Vec<String>, ApplicationError> {
        let ids: Vec<ArtifactId> = self.owned.lock().drain().collect();

        let mut deleted = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();
        for id in ids {
            match tokio::fs::remove_file(self.path_for(&id)).await {
                Ok(()) => deleted.push(id.filename()),
                Err(e) if e.kind() == ErrorKind::NotFound => deleted.push(id.filename()),
                Err(e) => {
                    warn!(filename = %id.filename(), error = %e, "Failed to delete artifact");
                    failed.push(id);
                },
            }
        }

        if !failed.is_empty() {
            let count = failed.len();
            self.owned.lock().extend(failed);
            return Err(ApplicationError::Storage(format!(
                "Failed to delete {count} artifact(s)"
            )));
        }

        deleted.sort();
        info!(count = deleted.len(), "Session artifacts deleted");
        Ok(deleted)
    }

    fn owned(&self) -> Vec<String> {
        let mut names: Vec<String> = self.owned.lock().iter().map(ArtifactId::filename).collect();
        names.sort();
        names
    }
}
