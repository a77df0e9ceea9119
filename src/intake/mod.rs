//! Conversation core — step tracking, prompt building, reply generation,
//! and the per-session state machine.

pub mod generator;
pub mod machine;
pub mod prompts;
pub mod recommend;
pub mod state;

pub use generator::ReplyGenerator;
pub use machine::{ConversationMachine, TurnReply};
pub use state::{IntakeStep, SessionState};
