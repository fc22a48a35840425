//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: language-model
//! inference, speech recognition and synthesis, and the filesystem
//! artifact store. Also owns configuration loading, the blocklist loader,
//! retry with backoff and logging initialization.

pub mod adapters;
pub mod blocklist;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use blocklist::{load_blocklist, parse_blocklist};
pub use config::{
    AppConfig, ArtifactsConfig, ModerationConfig, ServerConfig, SessionAppConfig,
};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{DEFAULT_LOG_FILTER, LogFormat, init_logging};
