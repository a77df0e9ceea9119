//! Reply generator — builds the per-turn prompt and calls the LLM provider.

use std::sync::Arc;

use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::prompts::{system_prompt, turn_prompt};
use super::state::{IntakeStep, SessionState};

/// Generation parameters for intake replies.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

/// Builds one prompt per turn and runs a single completion.
///
/// Never retries and never panics across its boundary: the caller always
/// gets usable text or an `LlmError`.
pub struct ReplyGenerator {
    llm: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl ReplyGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { llm, config }
    }

    /// Generate the reply for the step the session just entered.
    pub async fn generate(
        &self,
        state: &SessionState,
        entered: IntakeStep,
    ) -> Result<String, LlmError> {
        let messages = vec![
            ChatMessage::system(system_prompt()),
            ChatMessage::user(turn_prompt(state, entered)),
        ];
        let request = CompletionRequest::new(messages)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);

        let response = self.llm.complete(request).await?;
        let text = response.content.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.llm.model_name().to_string(),
                reason: "empty completion text".to_string(),
            });
        }
        Ok(text)
    }
}
