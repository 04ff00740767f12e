use crate::error::CollaboratorError;
use crate::llm::{CompletionRequest, LlmClient, Message};
use shared_types::{Language, LetterType, StructuredData};
use std::sync::Arc;

pub const WRITER_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 3000;
const TEMPERATURE: f32 = 0.3;

/// Writes the formal letter from structured data
pub struct LetterWriter {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

impl LetterWriter {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self {
            llm_client,
            model: WRITER_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Raw letter markup as returned by the model
    pub async fn write(
        &self,
        structured: &StructuredData,
        language: Language,
        letter_type: LetterType,
    ) -> Result<String, CollaboratorError> {
        tracing::info!(
            provider = self.llm_client.provider(),
            model = %self.model,
            "Generating letter"
        );

        let request = CompletionRequest {
            model: self.model.clone(),
            system: Some(super::system_prompt::build_system_prompt()),
            messages: vec![Message::user(super::system_prompt::build_user_prompt(
                structured,
                language,
                letter_type,
            )?)],
            max_tokens: MAX_TOKENS,
            temperature: Some(TEMPERATURE),
        };

        let response = self.llm_client.complete(request).await?;
        tracing::info!("Letter generated: {} characters", response.text.len());
        Ok(response.text)
    }
}
