//! Solace HTTP presentation layer
//!
//! This crate provides the HTTP API for Solace: the chat endpoint, audio
//! artifact retrieval, session teardown and a health probe.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
pub use routes::{create_router, with_middleware};
pub use state::AppState;
