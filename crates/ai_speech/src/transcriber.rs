//! Batch-job transcription
//!
//! Stages a recording, submits a transcription job and polls it until it
//! reaches a terminal state. Polling backs off exponentially, is bounded by
//! an overall timeout and stops as soon as the caller's token is cancelled.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::SpeechError;
use crate::ports::{AudioStaging, SpeechToText, TranscriptionJobs};
use crate::types::{AudioData, JobState, StagedAudio, Transcription, TranscriptionJobRequest};

/// Backoff schedule for job status polling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    /// Limit for the whole transcription, staging included
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(8),
            multiplier: 2.0,
            timeout: Duration::from_secs(120),
        }
    }
}

impl PollPolicy {
    /// Delay following `current`
    #[must_use]
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier.max(1.0)).min(self.max_interval)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// [`SpeechToText`] backed by staged uploads and batch transcription jobs
pub struct JobTranscriber {
    staging: Arc<dyn AudioStaging>,
    jobs: Arc<dyn TranscriptionJobs>,
    policy: PollPolicy,
    language_code: String,
    key_prefix: String,
}

impl std::fmt::Debug for JobTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTranscriber")
            .field("policy", &self.policy)
            .field("language_code", &self.language_code)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl JobTranscriber {
    /// Create a transcriber
    pub fn new(
        staging: Arc<dyn AudioStaging>,
        jobs: Arc<dyn TranscriptionJobs>,
        policy: PollPolicy,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            staging,
            jobs,
            policy,
            language_code: language_code.into(),
            key_prefix: String::new(),
        }
    }

    /// Prefix prepended to every staged object key
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.key_prefix = if prefix.is_empty() || prefix.ends_with('/') {
            prefix
        } else {
            format!("{prefix}/")
        };
        self
    }

    async fn run_job(
        &self,
        staged: &StagedAudio,
        audio: &AudioData,
        job_name: &str,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Transcription, SpeechError> {
        let request = TranscriptionJobRequest {
            job_name: job_name.to_string(),
            media_uri: staged.uri.clone(),
            format: audio.format(),
            language_code: self.language_code.clone(),
        };
        self.jobs.start_job(&request).await?;
        info!(job_name, media_uri = %staged.uri, "Transcription job submitted");

        let mut interval = self.policy.initial_interval;
        let mut polls: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(SpeechError::Cancelled);
            }

            polls += 1;
            match self.jobs.job_state(job_name).await? {
                JobState::Completed { transcript_uri } => {
                    debug!(job_name, polls, "Transcription job completed");
                    let document = self.jobs.fetch_transcript(&transcript_uri).await?;
                    let text = document.first_transcript()?;
                    return Ok(Transcription::new(text)
                        .with_language(&self.language_code)
                        .with_job_name(job_name));
                },
                JobState::Failed { reason } => {
                    warn!(job_name, reason = %reason, "Transcription job failed");
                    return Err(SpeechError::TranscriptionFailed(reason));
                },
                state @ (JobState::Queued | JobState::InProgress) => {
                    debug!(job_name, polls, ?state, "Transcription job pending");
                },
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(job_name, polls, "Transcription job timed out");
                return Err(SpeechError::Timeout(self.policy.timeout_ms()));
            }

            let wait = interval.min(deadline - now);
            tokio::select! {
                () = cancel.cancelled() => return Err(SpeechError::Cancelled),
                () = tokio::time::sleep(wait) => {},
            }
            interval = self.policy.next_interval(interval);
        }
    }
}

#[async_trait]
impl SpeechToText for JobTranscriber {
    #[instrument(skip(self, audio, cancel), fields(audio_size = audio.size_bytes(), format = %audio.format()))]
    async fn transcribe(
        &self,
        audio: AudioData,
        cancel: CancellationToken,
    ) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        let deadline = Instant::now() + self.policy.timeout;
        let id = Uuid::new_v4();
        let job_name = format!("solace-{id}");
        let key = format!("{}{id}.{}", self.key_prefix, audio.format().extension());

        let staged = tokio::select! {
            () = cancel.cancelled() => return Err(SpeechError::Cancelled),
            staged = self.staging.stage(&key, &audio) => staged?,
        };
        debug!(key = %staged.key, "Recording staged");

        let result = self
            .run_job(&staged, &audio, &job_name, deadline, &cancel)
            .await;

        if let Err(e) = self.staging.remove(&staged.key).await {
            warn!(key = %staged.key, error = %e, "Failed to remove staged recording");
        }

        result
    }

    fn model_name(&self) -> &str {
        "aws-transcribe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TranscriptDocument;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct RecordingStaging {
        staged: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AudioStaging for RecordingStaging {
        async fn stage(&self, key: &str, _audio: &AudioData) -> Result<StagedAudio, SpeechError> {
            self.staged.lock().push(key.to_string());
            Ok(StagedAudio {
                key: key.to_string(),
                uri: format!("s3://bucket/{key}"),
            })
        }

        async fn remove(&self, key: &str) -> Result<(), SpeechError> {
            self.removed.lock().push(key.to_string());
            Ok(())
        }
    }

    /// Replays a scripted sequence of job states, repeating the last one
    struct ScriptedJobs {
        states: Mutex<VecDeque<JobState>>,
        last: Mutex<Option<JobState>>,
        started: Mutex<Vec<TranscriptionJobRequest>>,
        polls: Mutex<u32>,
        document: String,
    }

    impl ScriptedJobs {
        fn new(states: Vec<JobState>, document: &str) -> Self {
            Self {
                states: Mutex::new(states.into()),
                last: Mutex::new(None),
                started: Mutex::new(Vec::new()),
                polls: Mutex::new(0),
                document: document.to_string(),
            }
        }
    }

    #[async_trait]
    impl TranscriptionJobs for ScriptedJobs {
        async fn start_job(&self, request: &TranscriptionJobRequest) -> Result<(), SpeechError> {
            self.started.lock().push(request.clone());
            Ok(())
        }

        async fn job_state(&self, _job_name: &str) -> Result<JobState, SpeechError> {
            *self.polls.lock() += 1;
            let next = self.states.lock().pop_front();
            let mut last = self.last.lock();
            if let Some(state) = next {
                *last = Some(state);
            }
            Ok(last.clone().unwrap_or(JobState::InProgress))
        }

        async fn fetch_transcript(
            &self,
            _transcript_uri: &str,
        ) -> Result<TranscriptDocument, SpeechError> {
            TranscriptDocument::parse(self.document.as_bytes())
        }
    }

    fn fast_policy(timeout_ms: u64) -> PollPolicy {
        PollPolicy {
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(4),
            multiplier: 2.0,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    fn wav_bytes() -> Vec<u8> {
        let mut bytes = b"RIFF\0\0\0\0WAVE".to_vec();
        bytes.extend_from_slice(&[0; 16]);
        bytes
    }

    const DOC: &str = r#"{"results": {"transcripts": [{"transcript": "  I can't sleep.  "}]}}"#;

    #[test]
    fn next_interval_grows_and_caps() {
        let policy = PollPolicy::default();
        assert_eq!(
            policy.next_interval(Duration::from_secs(1)),
            Duration::from_secs(2)
        );
        assert_eq!(
            policy.next_interval(Duration::from_secs(6)),
            Duration::from_secs(8)
        );
    }

    #[tokio::test]
    async fn completes_after_pending_polls() {
        let staging = Arc::new(RecordingStaging::default());
        let jobs = Arc::new(ScriptedJobs::new(
            vec![
                JobState::Queued,
                JobState::InProgress,
                JobState::Completed {
                    transcript_uri: "https://example/t.json".into(),
                },
            ],
            DOC,
        ));
        let transcriber = JobTranscriber::new(staging.clone(), jobs.clone(), fast_policy(5000), "en-US")
            .with_key_prefix("uploads");

        let result = transcriber
            .transcribe(AudioData::sniffed(wav_bytes()), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.text, "I can't sleep.");
        assert_eq!(result.language.as_deref(), Some("en-US"));
        assert_eq!(*jobs.polls.lock(), 3);

        let started = jobs.started.lock();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].format, crate::types::AudioFormat::Wav);
        assert_eq!(started[0].language_code, "en-US");
        assert_eq!(result.job_name.as_deref(), Some(started[0].job_name.as_str()));

        let staged = staging.staged.lock();
        assert!(staged[0].starts_with("uploads/"));
        assert!(staged[0].ends_with(".wav"));
        assert_eq!(*staging.removed.lock(), *staged);
    }

    #[tokio::test]
    async fn failed_job_is_transcription_error() {
        let staging = Arc::new(RecordingStaging::default());
        let jobs = Arc::new(ScriptedJobs::new(
            vec![JobState::Failed {
                reason: "unsupported media".into(),
            }],
            DOC,
        ));
        let transcriber = JobTranscriber::new(staging.clone(), jobs, fast_policy(5000), "en-US");

        let err = transcriber
            .transcribe(AudioData::sniffed(wav_bytes()), CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            SpeechError::TranscriptionFailed(reason) => assert_eq!(reason, "unsupported media"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(staging.removed.lock().len(), 1);
    }

    #[tokio::test]
    async fn never_finishing_job_times_out() {
        let staging = Arc::new(RecordingStaging::default());
        let jobs = Arc::new(ScriptedJobs::new(vec![JobState::InProgress], DOC));
        let transcriber = JobTranscriber::new(staging.clone(), jobs.clone(), fast_policy(30), "en-US");

        let err = transcriber
            .transcribe(AudioData::sniffed(wav_bytes()), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::Timeout(30)));
        assert!(*jobs.polls.lock() > 1);
        assert_eq!(staging.removed.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_policy_backs_off_until_deadline() {
        let staging = Arc::new(RecordingStaging::default());
        let jobs = Arc::new(ScriptedJobs::new(vec![JobState::InProgress], DOC));
        let transcriber =
            JobTranscriber::new(staging, jobs.clone(), PollPolicy::default(), "en-US");

        let started = Instant::now();
        let err = transcriber
            .transcribe(AudioData::sniffed(wav_bytes()), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::Timeout(120_000)));
        assert!(started.elapsed() >= Duration::from_secs(120));
        // 1s, 2s, 4s, then capped at 8s: far fewer polls than one per second
        let polls = *jobs.polls.lock();
        assert!((15..=25).contains(&polls), "polled {polls} times");
    }

    #[tokio::test]
    async fn cancellation_stops_polling() {
        let staging = Arc::new(RecordingStaging::default());
        let jobs = Arc::new(ScriptedJobs::new(vec![JobState::InProgress], DOC));
        let transcriber = JobTranscriber::new(staging.clone(), jobs, fast_policy(60_000), "en-US");

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = transcriber
            .transcribe(AudioData::sniffed(wav_bytes()), token)
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::Cancelled));
        assert_eq!(staging.removed.lock().len(), 1);
    }

    #[tokio::test]
    async fn malformed_document_is_reported() {
        let staging = Arc::new(RecordingStaging::default());
        let jobs = Arc::new(ScriptedJobs::new(
            vec![JobState::Completed {
                transcript_uri: "u".into(),
            }],
            r#"{"results": {}}"#,
        ));
        let transcriber = JobTranscriber::new(staging, jobs, fast_policy(5000), "en-US");

        let err = transcriber
            .transcribe(AudioData::sniffed(wav_bytes()), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_audio_is_rejected_before_staging() {
        let staging = Arc::new(RecordingStaging::default());
        let jobs = Arc::new(ScriptedJobs::new(vec![], DOC));
        let transcriber = JobTranscriber::new(staging.clone(), jobs, fast_policy(5000), "en-US");

        let err = transcriber
            .transcribe(AudioData::sniffed(Vec::new()), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::InvalidAudio(_)));
        assert!(staging.staged.lock().is_empty());
    }
}
