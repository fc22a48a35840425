//! Speech synthesis port - Interface for text-to-speech

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for synthesizing speech
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// Synthesize `text` into a complete WAV file
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ApplicationError>;

    /// Voice used for every synthesis
    fn voice(&self) -> String;
}
