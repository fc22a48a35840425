//! Application services - Use case implementations

mod blocklist_filter;
mod response_generator;
mod sentiment_classifier;
mod session_orchestrator;

pub use blocklist_filter::BlocklistFilter;
pub use response_generator::{ResponseGenerator, THERAPIST_PERSONA, system_prompt};
pub use sentiment_classifier::{SentimentClassifier, classification_prompt, normalize_label};
pub use session_orchestrator::{SessionConfig, SessionOrchestrator, SessionPorts};
