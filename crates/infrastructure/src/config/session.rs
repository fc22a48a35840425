//! Per-request session behaviour.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Chat request handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAppConfig {
    /// Classify sentiment and steer the reply's tone
    #[serde(default = "default_true")]
    pub sentiment_enabled: bool,

    /// Upper bound for a single chat request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

const fn default_request_timeout() -> u64 {
    180
}

impl Default for SessionAppConfig {
    fn default() -> Self {
        Self {
            sentiment_enabled: true,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl SessionAppConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("session request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
