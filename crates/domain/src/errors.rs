//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Neither text nor audio was supplied
    #[error("No input provided: send a message or an audio recording")]
    InputMissing,

    /// Artifact identifier or filename is not valid
    #[error("Invalid artifact id: {0}")]
    InvalidArtifactId(String),

    /// A request tried to move between states that are not connected
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_creates_correct_error() {
        let err = DomainError::not_found("AudioArtifact", "abc.wav");
        match err {
            DomainError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "AudioArtifact");
                assert_eq!(id, "abc.wav");
            },
            _ => unreachable!("Expected NotFound error"),
        }
    }

    #[test]
    fn not_found_error_message_is_correct() {
        let err = DomainError::not_found("AudioArtifact", "abc.wav");
        assert_eq!(err.to_string(), "AudioArtifact not found: abc.wav");
    }

    #[test]
    fn input_missing_message_guides_the_user() {
        let err = DomainError::InputMissing;
        assert!(err.to_string().contains("No input provided"));
    }

    #[test]
    fn invalid_transition_message() {
        let err = DomainError::InvalidStateTransition {
            from: "moderating".to_string(),
            to: "responded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition from moderating to responded"
        );
    }

    #[test]
    fn invalid_artifact_message() {
        let err = DomainError::InvalidArtifactId("../etc/passwd".to_string());
        assert_eq!(err.to_string(), "Invalid artifact id: ../etc/passwd");
    }
}
