//! Blocklist loading
//!
//! The blocklist file holds one or more terms per line, separated by commas.
//! Blank entries and lines starting with `#` are ignored and surrounding
//! quotes are stripped. A file that cannot be read or parsed disables
//! screening instead of aborting startup.

use application::services::BlocklistFilter;
use tracing::{info, warn};

use crate::config::ModerationConfig;

/// Split blocklist file contents into terms
pub fn parse_blocklist(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(|term| term.trim().trim_matches(|c: char| c == '"' || c == '\'').trim())
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the blocklist filter described by `config`
///
/// Never fails: a disabled, missing or unreadable blocklist yields an empty
/// filter that blocks nothing.
pub async fn load_blocklist(config: &ModerationConfig) -> BlocklistFilter {
    if !config.enabled {
        info!("Blocklist screening disabled");
        return BlocklistFilter::empty();
    }

    let Some(path) = &config.blocklist_path else {
        warn!("No blocklist path configured, screening nothing");
        return BlocklistFilter::empty();
    };

    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read blocklist, screening nothing");
            return BlocklistFilter::empty();
        },
    };

    match BlocklistFilter::from_terms(parse_blocklist(&contents)) {
        Ok(filter) => {
            info!(path = %path.display(), terms = filter.len(), "Blocklist loaded");
            filter
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to build blocklist, screening nothing");
            BlocklistFilter::empty()
        },
    }
}
