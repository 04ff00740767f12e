//! Speech-to-text for recorded letters.

use crate::error::CollaboratorError;
use crate::llm::groq::GROQ_BASE_URL;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use shared_types::Language;
use std::time::Duration;

pub const WHISPER_MODEL: &str = "whisper-large-v3";
const PROVIDER: &str = "Groq";
const DEFAULT_FILENAME: &str = "recording.webm";
const MIN_TRANSCRIPT_CHARS: usize = 5;

/// An uploaded recording
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: String,
}

impl AudioClip {
    pub fn file_name(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
    }
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: AudioClip, language: Language) -> Result<String, CollaboratorError>;
}

/// Trim a transcript and reject one too short to write a letter from
pub fn accept_transcript(transcript: &str) -> Result<String, CollaboratorError> {
    let trimmed = transcript.trim();
    if trimmed.chars().count() < MIN_TRANSCRIPT_CHARS {
        return Err(CollaboratorError::TranscriptTooShort);
    }
    Ok(trimmed.to_string())
}

/// Whisper on Groq's audio transcription endpoint
pub struct WhisperTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CollaboratorError::transport(PROVIDER))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_string(),
            model: WHISPER_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, clip: AudioClip, language: Language) -> Result<String, CollaboratorError> {
        tracing::info!(model = %self.model, bytes = clip.bytes.len(), "Transcribing recording");

        let file_name = clip.file_name().to_string();
        let part = Part::bytes(clip.bytes)
            .file_name(file_name)
            .mime_str(&clip.content_type)
            .map_err(CollaboratorError::transport(PROVIDER))?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", language.transcription_hint())
            .text("response_format", "text")
            .text("temperature", "0");

        let url = format!("{}/audio/transcriptions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(CollaboratorError::transport(PROVIDER))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Transcription failed ({}): {}", status, text);
            return Err(CollaboratorError::from_status(PROVIDER, status, text));
        }

        let text = resp
            .text()
            .await
            .map_err(CollaboratorError::decode(PROVIDER))?;
        let transcript = accept_transcript(&text)?;

        tracing::info!("Transcription successful: {} characters", transcript.len());
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_transcript() {
        assert_eq!(accept_transcript("  boss I MC lah \n").unwrap(), "boss I MC lah");
        assert!(matches!(
            accept_transcript(" ok  "),
            Err(CollaboratorError::TranscriptTooShort)
        ));
        assert!(matches!(accept_transcript(""), Err(CollaboratorError::TranscriptTooShort)));
    }

    #[test]
    fn test_default_file_name() {
        let clip = AudioClip {
            bytes: vec![0; 4],
            filename: None,
            content_type: "audio/webm".to_string(),
        };
        assert_eq!(clip.file_name(), "recording.webm");

        let named = AudioClip {
            filename: Some("aduan.mp3".to_string()),
            ..clip
        };
        assert_eq!(named.file_name(), "aduan.mp3");
    }
}
