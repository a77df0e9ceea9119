//! LLM integration — the generation-service boundary.
//!
//! The conversation core talks to `LlmProvider` only; the concrete
//! implementation is an HTTP client for Groq's OpenAI-compatible
//! chat-completions endpoint.

mod groq;
pub mod provider;

pub use groq::GroqProvider;
pub use provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role};
