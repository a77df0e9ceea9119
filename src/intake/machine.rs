//! ConversationMachine — one state machine per session, orchestrating
//! validation, field mutation, persistence, and reply generation.

use std::sync::Arc;

use tracing::warn;

use crate::store::{LeadStore, NewLead};

use super::generator::ReplyGenerator;
use super::prompts::{
    fallback_reply, CLOSING_REPLY, NEEDS_UNSPECIFIED, REPROMPT_BUSINESS_TYPE, REPROMPT_EMAIL,
    REPROMPT_NAME, SAVE_APOLOGY,
};
use super::recommend::BUSINESS_TYPE_CHOICES;
use super::state::{IntakeStep, SessionState};

/// The outbound side of one turn: the reply text plus optional quick-reply
/// buttons (advisory UI hint, not protocol-required).
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub text: String,
    pub buttons: Option<Vec<String>>,
}

impl TurnReply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: None,
        }
    }
}

/// Orchestrates one session's intake conversation.
///
/// Side effects per accepted message are strictly ordered: validate →
/// mutate state → persist (terminal step only) → generate reply → emit.
/// Generation failure never blocks progression; validation failure never
/// mutates state.
pub struct ConversationMachine {
    state: SessionState,
    generator: Arc<ReplyGenerator>,
    store: Arc<dyn LeadStore>,
}

impl ConversationMachine {
    /// Create a fresh machine for a new connection.
    pub fn new(generator: Arc<ReplyGenerator>, store: Arc<dyn LeadStore>) -> Self {
        Self {
            state: SessionState::default(),
            generator,
            store,
        }
    }

    /// Current step, for transport-level logging.
    pub fn step(&self) -> IntakeStep {
        self.state.step
    }

    /// Collected fields so far.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The unconditional greeting emitted on connection establishment,
    /// before any inbound message.
    pub async fn greeting(&self) -> TurnReply {
        TurnReply::text(self.reply_for(IntakeStep::AwaitingName).await)
    }

    /// Process one inbound message and produce the outbound reply.
    pub async fn handle_message(&mut self, raw: &str) -> TurnReply {
        let msg = raw.trim();

        match self.state.step {
            IntakeStep::AwaitingName => {
                if msg.is_empty() {
                    return TurnReply::text(REPROMPT_NAME);
                }
                self.state.name = msg.to_string();
                self.state.advance();
                TurnReply::text(self.reply_for(IntakeStep::AwaitingEmail).await)
            }
            IntakeStep::AwaitingEmail => {
                if !msg.contains('@') {
                    return TurnReply::text(REPROMPT_EMAIL);
                }
                self.state.email = msg.to_string();
                self.state.advance();
                TurnReply {
                    text: self.reply_for(IntakeStep::AwaitingBusinessType).await,
                    buttons: Some(
                        BUSINESS_TYPE_CHOICES.iter().map(|s| s.to_string()).collect(),
                    ),
                }
            }
            IntakeStep::AwaitingBusinessType => {
                if msg.is_empty() {
                    return TurnReply::text(REPROMPT_BUSINESS_TYPE);
                }
                self.state.business_type = msg.to_string();
                self.state.advance();
                TurnReply::text(self.reply_for(IntakeStep::AwaitingNeeds).await)
            }
            IntakeStep::AwaitingNeeds => {
                self.state.needs = if msg.is_empty() {
                    NEEDS_UNSPECIFIED.to_string()
                } else {
                    msg.to_string()
                };
                self.state.advance();

                // Persist before generating — the transition stands even if
                // either of the two external calls fails.
                let save_failed = match self.store.save(&self.lead_record()).await {
                    Ok(id) => {
                        tracing::info!(lead_id = id, name = %self.state.name, "Lead saved");
                        false
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to save lead");
                        true
                    }
                };

                let mut text = self.reply_for(IntakeStep::Complete).await;
                if save_failed {
                    text.push_str(SAVE_APOLOGY);
                }
                TurnReply::text(text)
            }
            IntakeStep::Complete => TurnReply::text(CLOSING_REPLY),
        }
    }

    fn lead_record(&self) -> NewLead {
        NewLead {
            name: self.state.name.clone(),
            email: self.state.email.clone(),
            business_type: self.state.business_type.clone(),
            needs: self.state.needs.clone(),
        }
    }

    /// Generate the reply for the step the session just entered, falling
    /// back to the canned sentence when the generation service is
    /// unavailable.
    async fn reply_for(&self, entered: IntakeStep) -> String {
        match self.generator.generate(&self.state, entered).await {
            Ok(text) => text,
            Err(e) => {
                warn!(step = %entered, error = %e, "Generation failed, using canned reply");
                fallback_reply(&self.state, entered)
            }
        }
    }
}
