//! S3 staging for recordings awaiting transcription

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, instrument};

use crate::aws::map_sdk_error;
use crate::error::SpeechError;
use crate::ports::AudioStaging;
use crate::types::{AudioData, StagedAudio};

/// Stages recordings in an S3 bucket
#[derive(Debug, Clone)]
pub struct S3AudioStaging {
    client: Client,
    bucket: String,
}

impl S3AudioStaging {
    /// Create a stager for `bucket`
    pub fn new(sdk_config: &SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(sdk_config),
            bucket: bucket.into(),
        }
    }

    /// URI Transcribe reads the object from
    pub fn object_uri(&self, key: &str) -> String {
        format!("s3://{}/{key}", self.bucket)
    }
}

#[async_trait]
impl AudioStaging for S3AudioStaging {
    #[instrument(skip(self, audio), fields(bucket = %self.bucket, size = audio.size_bytes()))]
    async fn stage(&self, key: &str, audio: &AudioData) -> Result<StagedAudio, SpeechError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(audio.data().to_vec()))
            .content_type(audio.mime_type())
            .send()
            .await
            .map_err(|e| map_sdk_error(&e, SpeechError::StagingFailed))?;

        debug!(key, "Uploaded recording");

        Ok(StagedAudio {
            key: key.to_string(),
            uri: self.object_uri(key),
        })
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn remove(&self, key: &str) -> Result<(), SpeechError> {
        // S3 reports success for keys that are already gone
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(&e, SpeechError::StagingFailed))?;
        Ok(())
    }
}
