//! AWS Transcribe batch jobs

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_transcribe::Client;
use aws_sdk_transcribe::types::{LanguageCode, Media, MediaFormat, TranscriptionJobStatus};
use reqwest::Client as HttpClient;
use tracing::{debug, instrument, warn};

use crate::aws::map_sdk_error;
use crate::error::SpeechError;
use crate::ports::TranscriptionJobs;
use crate::types::{JobState, TranscriptDocument, TranscriptionJobRequest};

/// Downloads transcript documents from the pre-signed URI of a finished job
#[derive(Debug, Clone)]
pub struct TranscriptFetcher {
    client: HttpClient,
}

impl TranscriptFetcher {
    /// Create a fetcher with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, SpeechError> {
        let client = HttpClient::builder().timeout(timeout).build().map_err(|e| {
            SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self { client })
    }

    /// Download and decode the document at `uri`
    #[instrument(skip(self, uri))]
    pub async fn fetch(&self, uri: &str) -> Result<TranscriptDocument, SpeechError> {
        let response = self.client.get(uri).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Transcript download failed");
            return Err(if status.is_server_error() {
                SpeechError::ServiceUnavailable(format!("HTTP {status}: {body}"))
            } else {
                SpeechError::TranscriptionFailed(format!("transcript download HTTP {status}"))
            });
        }

        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), "Transcript downloaded");
        TranscriptDocument::parse(&bytes)
    }
}

/// Transcription jobs on AWS Transcribe
#[derive(Debug, Clone)]
pub struct AwsTranscribeJobs {
    client: Client,
    fetcher: TranscriptFetcher,
}

impl AwsTranscribeJobs {
    pub fn new(sdk_config: &SdkConfig, fetcher: TranscriptFetcher) -> Self {
        Self {
            client: Client::new(sdk_config),
            fetcher,
        }
    }
}

#[async_trait]
impl TranscriptionJobs for AwsTranscribeJobs {
    #[instrument(skip(self, request), fields(job_name = %request.job_name, format = %request.format))]
    async fn start_job(&self, request: &TranscriptionJobRequest) -> Result<(), SpeechError> {
        let media = Media::builder().media_file_uri(&request.media_uri).build();

        self.client
            .start_transcription_job()
            .transcription_job_name(&request.job_name)
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .media(media)
            .media_format(MediaFormat::from(request.format.extension()))
            .send()
            .await
            .map_err(|e| map_sdk_error(&e, SpeechError::TranscriptionFailed))?;

        Ok(())
    }

    async fn job_state(&self, job_name: &str) -> Result<JobState, SpeechError> {
        let response = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| map_sdk_error(&e, SpeechError::TranscriptionFailed))?;

        let job = response.transcription_job().ok_or_else(|| {
            SpeechError::MalformedResponse(format!("job {job_name} missing from status response"))
        })?;

        let state = match job.transcription_job_status() {
            Some(TranscriptionJobStatus::Completed) => {
                let transcript_uri = job
                    .transcript()
                    .and_then(|t| t.transcript_file_uri())
                    .ok_or_else(|| {
                        SpeechError::MalformedResponse(
                            "completed job has no transcript URI".to_string(),
                        )
                    })?;
                JobState::Completed {
                    transcript_uri: transcript_uri.to_string(),
                }
            },
            Some(TranscriptionJobStatus::Failed) => JobState::Failed {
                reason: job.failure_reason().unwrap_or("unknown reason").to_string(),
            },
            Some(TranscriptionJobStatus::Queued) => JobState::Queued,
            _ => JobState::InProgress,
        };

        Ok(state)
    }

    async fn fetch_transcript(
        &self,
        transcript_uri: &str,
    ) -> Result<TranscriptDocument, SpeechError> {
        self.fetcher.fetch(transcript_uri).await
    }
}
