//! Application layer - Use cases and orchestration
//!
//! Contains the chat pipeline's services and the port definitions its
//! adapters implement. Orchestrates domain objects and infrastructure
//! adapters without knowing which providers sit behind the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
