//! Domain layer for Solace
//!
//! Contains the chat pipeline's entities, value objects, the per-request
//! state machine and domain errors. This layer has no I/O and defines the
//! ubiquitous language shared by every other crate.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
