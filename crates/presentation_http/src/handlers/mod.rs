//! HTTP request handlers

pub mod audio;
pub mod chat;
pub mod health;
pub mod session;
