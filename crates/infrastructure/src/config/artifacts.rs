//! Generated audio storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where synthesized speech is written and how clients reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory for generated WAV files (created on demand)
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Base URL prepended to `/audio/<filename>` in responses
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_directory() -> PathBuf {
    PathBuf::from("data/audio")
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl ArtifactsConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.directory.as_os_str().is_empty() {
            return Err("artifacts directory must not be empty".to_string());
        }
        if !(self.public_base_url.starts_with("http://")
            || self.public_base_url.starts_with("https://"))
        {
            return Err(format!(
                "artifacts public_base_url must be an http(s) URL, got '{}'",
                self.public_base_url
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_absolute_urls() {
        let config = ArtifactsConfig::default();
        assert_eq!(config.directory, PathBuf::from("data/audio"));
        assert_eq!(config.public_base_url, "http://127.0.0.1:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_or_relative_base_is_rejected() {
        for base in ["", "/audio", "ftp://host"] {
            let config = ArtifactsConfig {
                public_base_url: base.to_string(),
                ..ArtifactsConfig::default()
            };
            assert!(config.validate().is_err(), "accepted {base:?}");
        }
    }

    #[test]
    fn empty_directory_is_rejected() {
        let config = ArtifactsConfig {
            directory: PathBuf::new(),
            ..ArtifactsConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
