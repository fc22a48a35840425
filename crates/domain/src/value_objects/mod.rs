//! Value Objects - Immutable, identity-less domain primitives

mod artifact_id;
mod sentiment;

pub use artifact_id::{ARTIFACT_EXTENSION, ArtifactId};
pub use sentiment::{Sentiment, SentimentLabel};
