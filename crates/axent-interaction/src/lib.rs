//! Interaction layer: the concrete assistant client.
//!
//! Implements the `Assistant` contract from `axent-core` against the
//! Gemini REST API.

pub mod gemini_assistant;

pub use gemini_assistant::GeminiAssistant;
