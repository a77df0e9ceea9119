//! Session transport — maps each WebSocket connection to one conversation
//! state machine.

pub mod ws;

pub use ws::{intake_routes, AppState};
