//! Per-request processing state machine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Processing state of a single chat request
///
/// ```text
/// ReceivingInput -> TextProvided ----------------> Moderating -> GeneratingReply
///                -> AudioProvided -> Transcribing ->            -> Synthesizing
///                                                               -> Responding -> Responded
/// ```
///
/// `Rejected` is reachable from `ReceivingInput` (no input) and
/// `Moderating` (blocked). `Failed` is reachable from every non-terminal
/// state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    ReceivingInput,
    TextProvided,
    AudioProvided,
    Transcribing,
    Moderating,
    GeneratingReply,
    Synthesizing,
    Responding,
    Responded,
    Rejected,
    Failed,
}

impl SessionState {
    /// Check if the state ends the request
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Responded | Self::Rejected | Self::Failed)
    }

    /// Check whether `next` directly follows this state
    pub const fn can_transition_to(&self, next: Self) -> bool {
        use SessionState::{
            AudioProvided, Failed, GeneratingReply, Moderating, ReceivingInput, Rejected,
            Responded, Responding, Synthesizing, TextProvided, Transcribing,
        };

        if self.is_terminal() {
            return false;
        }

        matches!(
            (*self, next),
            (ReceivingInput, TextProvided | AudioProvided | Rejected)
                | (AudioProvided, Transcribing)
                | (TextProvided | Transcribing, Moderating)
                | (Moderating, GeneratingReply | Rejected)
                | (GeneratingReply, Synthesizing)
                | (Synthesizing, Responding)
                | (Responding, Responded)
                | (_, Failed)
        )
    }

    /// Move to `next`, failing if the states are not connected
    pub fn transition_to(self, next: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReceivingInput => "receiving_input",
            Self::TextProvided => "text_provided",
            Self::AudioProvided => "audio_provided",
            Self::Transcribing => "transcribing",
            Self::Moderating => "moderating",
            Self::GeneratingReply => "generating_reply",
            Self::Synthesizing => "synthesizing",
            Self::Responding => "responding",
            Self::Responded => "responded",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(states: &[SessionState]) -> Result<SessionState, DomainError> {
        states
            .iter()
            .try_fold(SessionState::ReceivingInput, |s, next| s.transition_to(*next))
    }

    #[test]
    fn text_happy_path() {
        let end = walk(&[
            SessionState::TextProvided,
            SessionState::Moderating,
            SessionState::GeneratingReply,
            SessionState::Synthesizing,
            SessionState::Responding,
            SessionState::Responded,
        ])
        .unwrap();
        assert_eq!(end, SessionState::Responded);
        assert!(end.is_terminal());
    }

    #[test]
    fn audio_happy_path_goes_through_transcribing() {
        let end = walk(&[
            SessionState::AudioProvided,
            SessionState::Transcribing,
            SessionState::Moderating,
            SessionState::GeneratingReply,
            SessionState::Synthesizing,
            SessionState::Responding,
            SessionState::Responded,
        ])
        .unwrap();
        assert_eq!(end, SessionState::Responded);
    }

    #[test]
    fn audio_cannot_skip_transcription() {
        let err = walk(&[SessionState::AudioProvided, SessionState::Moderating]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }

    #[test]
    fn moderation_can_reject() {
        let end = walk(&[
            SessionState::TextProvided,
            SessionState::Moderating,
            SessionState::Rejected,
        ])
        .unwrap();
        assert_eq!(end, SessionState::Rejected);
    }

    #[test]
    fn cannot_reject_after_generation_started() {
        assert!(!SessionState::GeneratingReply.can_transition_to(SessionState::Rejected));
    }

    #[test]
    fn any_active_state_can_fail() {
        for state in [
            SessionState::ReceivingInput,
            SessionState::Transcribing,
            SessionState::GeneratingReply,
            SessionState::Synthesizing,
        ] {
            assert!(state.can_transition_to(SessionState::Failed), "{state}");
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for state in [
            SessionState::Responded,
            SessionState::Rejected,
            SessionState::Failed,
        ] {
            assert!(!state.can_transition_to(SessionState::Failed));
            assert!(!state.can_transition_to(SessionState::ReceivingInput));
        }
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(SessionState::GeneratingReply.to_string(), "generating_reply");
    }
}
