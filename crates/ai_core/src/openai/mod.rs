//! OpenAI-compatible chat completions client

mod client;

pub use client::OpenAiChatEngine;
