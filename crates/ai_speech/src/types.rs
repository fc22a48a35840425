//! Types for speech processing
//!
//! Contains data structures for audio data, formats, transcription jobs and
//! the transcript document schema.

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// OGG container (typically with Opus codec)
    Ogg,
    /// MP3 format
    Mp3,
    /// WAV format (uncompressed)
    Wav,
    /// FLAC format (lossless)
    Flac,
    /// WebM format (browser MediaRecorder default)
    Webm,
    /// M4A/AAC format
    M4a,
}

impl AudioFormat {
    /// Get the MIME type for this audio format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Webm => "audio/webm",
            Self::M4a => "audio/mp4",
        }
    }

    /// Get the file extension for this audio format
    ///
    /// Also the media format name Transcribe expects.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Webm => "webm",
            Self::M4a => "m4a",
        }
    }

    /// Parse audio format from MIME type
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        // Handle compound MIME types like "audio/webm;codecs=opus"
        let base_mime = mime.split(';').next().unwrap_or(mime).trim();
        match base_mime {
            "audio/ogg" | "audio/opus" => Some(Self::Ogg),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/webm" | "video/webm" => Some(Self::Webm),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Detect the container from its leading bytes
    ///
    /// Browsers label MediaRecorder output as `audio/wav` regardless of the
    /// real container, so the bytes are the only reliable signal.
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(Self::Wav),
            [b'O', b'g', b'g', b'S', ..] => Some(Self::Ogg),
            [0x1A, 0x45, 0xDF, 0xA3, ..] => Some(Self::Webm),
            [b'f', b'L', b'a', b'C', ..] => Some(Self::Flac),
            [b'I', b'D', b'3', ..] => Some(Self::Mp3),
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => Some(Self::Mp3),
            [_, _, _, _, b'f', b't', b'y', b'p', ..] => Some(Self::M4a),
            _ => None,
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Audio data with format metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Create audio data with the format detected from its bytes
    ///
    /// Unknown containers are assumed to be WAV.
    #[must_use]
    pub fn sniffed(data: Vec<u8>) -> Self {
        let format = AudioFormat::sniff(&data).unwrap_or(AudioFormat::Wav);
        Self { data, format }
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the MIME type
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Raw synthesized speech: signed 16-bit little-endian mono samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmAudio {
    pub data: Vec<u8>,
    pub sample_rate: u32,
}

impl PcmAudio {
    #[must_use]
    pub const fn new(data: Vec<u8>, sample_rate: u32) -> Self {
        Self { data, sample_rate }
    }

    /// Number of samples
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.data.len() / 2
    }
}

/// Result of a speech-to-text operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    /// Transcribed text, trimmed
    pub text: String,
    /// Language the recording was transcribed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Provider job that produced the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
}

impl Transcription {
    /// Create a transcription from raw provider text
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            language: None,
            job_name: None,
        }
    }

    /// Set the language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the originating job
    #[must_use]
    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = Some(job_name.into());
        self
    }

    /// Check if the transcription contains no speech
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A recording placed in provider-reachable storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAudio {
    /// Object key, used to remove the recording later
    pub key: String,
    /// URI the transcription provider reads from (`s3://bucket/key`)
    pub uri: String,
}

/// Parameters of a batch transcription job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionJobRequest {
    pub job_name: String,
    pub media_uri: String,
    pub format: AudioFormat,
    pub language_code: String,
}

/// Status of a submitted transcription job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Queued,
    InProgress,
    Completed {
        /// Where the transcript document can be downloaded
        transcript_uri: String,
    },
    Failed {
        reason: String,
    },
}

impl JobState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

/// Transcript document produced by a completed job
///
/// Only the fields the pipeline reads are modelled; anything else in the
/// document is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptDocument {
    #[serde(rename = "jobName", default)]
    pub job_name: Option<String>,
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptResults {
    pub transcripts: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    pub transcript: String,
}

impl TranscriptDocument {
    /// Decode and validate a transcript document
    pub fn parse(bytes: &[u8]) -> Result<Self, SpeechError> {
        serde_json::from_slice(bytes)
            .map_err(|e| SpeechError::MalformedResponse(format!("transcript document: {e}")))
    }

    /// Text of the first transcript segment
    pub fn first_transcript(&self) -> Result<&str, SpeechError> {
        self.results
            .transcripts
            .first()
            .map(|s| s.transcript.as_str())
            .ok_or_else(|| {
                SpeechError::MalformedResponse("transcript document has no segments".to_string())
            })
    }
}
