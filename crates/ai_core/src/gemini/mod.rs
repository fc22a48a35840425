//! Google Gemini generateContent client

mod client;

pub use client::GeminiEngine;
