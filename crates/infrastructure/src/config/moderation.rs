//! Content moderation configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Blocklist screening of user text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Screen messages against the blocklist
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// File with blocked terms (comma or newline separated, `#` comments)
    #[serde(default = "default_blocklist_path")]
    pub blocklist_path: Option<PathBuf>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_blocklist_path() -> Option<PathBuf> {
    Some(PathBuf::from("blocklist.txt"))
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            blocklist_path: default_blocklist_path(),
        }
    }
}
