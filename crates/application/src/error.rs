//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Neither a message nor a recording was supplied
    #[error("No input provided: send a message or an audio recording")]
    InputMissing,

    /// Input matched a blocklisted term
    ///
    /// The term is kept for logging and is never echoed to clients.
    #[error("Message contains blocked content")]
    ModerationBlocked { term: String },

    /// Speech recognition failed
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// The language model failed or returned nothing usable
    #[error("Response generation failed: {0}")]
    GenerationFailed(String),

    /// Speech synthesis failed
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// A provider answered with a document that does not match its schema
    #[error("Malformed provider response: {0}")]
    MalformedProviderResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The operation did not finish in time
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// The client went away before the request finished
    #[error("Request cancelled")]
    Cancelled,

    /// Requested resource does not exist (anymore)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Artifact filename is not a valid artifact name
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Reading or writing local files failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Domain-level error
    #[error(transparent)]
    Domain(DomainError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout(_))
    }

    /// Check if this error was caused by the client's input
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InputMissing
                | Self::ModerationBlocked { .. }
                | Self::InvalidArtifact(_)
                | Self::NotFound(_)
        )
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InputMissing => Self::InputMissing,
            DomainError::InvalidArtifactId(id) => Self::InvalidArtifact(id),
            DomainError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} {id}"))
            },
            other => Self::Domain(other),
        }
    }
}
