//! Intake Assist — conversational lead-intake core.

pub mod channels;
pub mod config;
pub mod error;
pub mod intake;
pub mod llm;
pub mod store;
