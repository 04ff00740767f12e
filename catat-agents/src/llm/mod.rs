//! Chat-completion clients for the letter agents.

pub mod claude;
pub mod groq;

pub use claude::ClaudeClient;
pub use groq::GroqClient;

use crate::error::CollaboratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Concatenated text of the answer
    pub text: String,
    pub model: String,
    pub stop_reason: Option<String>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name used in logs and error messages
    fn provider(&self) -> &'static str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, CollaboratorError>;
}
