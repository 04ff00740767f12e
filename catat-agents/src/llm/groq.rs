use super::{CompletionRequest, CompletionResponse, LlmClient, Message, Role};
use crate::error::CollaboratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const PROVIDER: &str = "Groq";

/// Client for Groq's OpenAI-compatible chat completions endpoint
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CollaboratorError::transport(PROVIDER))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// The system prompt travels as the first chat message
fn chat_messages(request: &CompletionRequest) -> Vec<Message> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = &request.system {
        messages.push(Message {
            role: Role::System,
            content: system.clone(),
        });
    }
    messages.extend(request.messages.iter().cloned());
    messages
}

#[async_trait]
impl LlmClient for GroqClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, CollaboratorError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &request.model,
            messages: chat_messages(&request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(model = %request.model, "Sending Groq chat completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(CollaboratorError::transport(PROVIDER))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Groq request failed ({}): {}", status, text);
            return Err(CollaboratorError::from_status(PROVIDER, status, text));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(CollaboratorError::decode(PROVIDER))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CollaboratorError::EmptyResponse { provider: PROVIDER })?;
        let text = choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or(CollaboratorError::EmptyResponse { provider: PROVIDER })?;

        Ok(CompletionResponse {
            text,
            model: parsed.model,
            stop_reason: choice.finish_reason,
        })
    }
}
