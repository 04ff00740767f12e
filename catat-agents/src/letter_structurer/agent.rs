use crate::error::CollaboratorError;
use crate::llm::{CompletionRequest, LlmClient, Message};
use letter_layout::strip_code_fence;
use shared_types::{
    ContactInfo, Language, LetterType, StructuredData, ToneDetected, UrgencyLevel,
};
use std::sync::Arc;

pub const STRUCTURER_MODEL: &str = "mixtral-8x7b-32768";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.1;
const FALLBACK_KEY_POINT_CHARS: usize = 200;

/// Extracts a [`StructuredData`] record from a speech transcript
pub struct LetterStructurer {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

impl LetterStructurer {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self {
            llm_client,
            model: STRUCTURER_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn structure(
        &self,
        transcript: &str,
        letter_type: LetterType,
    ) -> Result<StructuredData, CollaboratorError> {
        tracing::info!(
            provider = self.llm_client.provider(),
            model = %self.model,
            "Structuring transcript"
        );

        let request = CompletionRequest {
            model: self.model.clone(),
            system: Some(super::system_prompt::build_system_prompt()),
            messages: vec![Message::user(super::system_prompt::build_user_prompt(
                transcript,
                letter_type,
            ))],
            max_tokens: MAX_TOKENS,
            temperature: Some(TEMPERATURE),
        };

        let response = self.llm_client.complete(request).await?;
        Ok(parse_structured_data(&response.text, transcript, letter_type))
    }
}

/// Parse the model answer, falling back to a minimal record when it is not valid
pub fn parse_structured_data(
    response_text: &str,
    transcript: &str,
    letter_type: LetterType,
) -> StructuredData {
    let json = strip_code_fence(response_text);
    match serde_json::from_str::<StructuredData>(&json) {
        Ok(data) => {
            tracing::info!("Structuring successful");
            data
        }
        Err(err) => {
            tracing::warn!("Structured data parsing failed, using fallback: {}", err);
            fallback_record(transcript, letter_type)
        }
    }
}

pub fn fallback_record(transcript: &str, letter_type: LetterType) -> StructuredData {
    StructuredData {
        letter_type,
        sender: ContactInfo::default(),
        recipient: ContactInfo::default(),
        subject: "Letter content".to_string(),
        key_points: vec![transcript.chars().take(FALLBACK_KEY_POINT_CHARS).collect()],
        tone_detected: ToneDetected::Casual,
        language_preference: Language::English,
        dates_mentioned: Vec::new(),
        urgency_level: UrgencyLevel::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedClient {
        answer: String,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LlmClient for CannedClient {
        fn provider(&self) -> &'static str {
            "canned"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, CollaboratorError> {
            self.requests.lock().unwrap().push(request);
            Ok(CompletionResponse {
                text: self.answer.clone(),
                model: "canned".to_string(),
                stop_reason: None,
            })
        }
    }

    const ANSWER: &str = r#"```json
{
  "letter_type": "complaint",
  "sender": {"name": "Ali", "address": "", "contact": ""},
  "recipient": {"name": "", "title": "Pengarah", "organization": "MBPJ", "address": ""},
  "subject": "Longkang tersumbat",
  "key_points": ["Drain blocked"],
  "tone_detected": "manglish",
  "language_preference": "ms",
  "dates_mentioned": ["5 Mei"],
  "urgency_level": "high"
}
```"#;

    #[tokio::test]
    async fn test_structure_sends_prompts_and_parses() {
        let client = Arc::new(CannedClient {
            answer: ANSWER.to_string(),
            requests: Mutex::new(Vec::new()),
        });
        let structurer = LetterStructurer::new(client.clone());

        let data = structurer
            .structure("longkang sumbat lah", LetterType::Complaint)
            .await
            .unwrap();
        assert_eq!(data.subject, "Longkang tersumbat");
        assert_eq!(data.language_preference, Language::Malay);
        assert_eq!(data.urgency_level, UrgencyLevel::High);

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].model, STRUCTURER_MODEL);
        assert_eq!(requests[0].max_tokens, 2000);
        assert!(requests[0].messages[0].content.contains("Letter Type: complaint"));
        assert!(requests[0]
            .system
            .as_deref()
            .unwrap()
            .contains("Malaysian document analyzer"));
    }

    #[test]
    fn test_fallback_on_invalid_json() {
        let transcript = "x".repeat(300);
        let data = parse_structured_data("Sorry, I cannot help.", &transcript, LetterType::Mc);

        assert_eq!(data.letter_type, LetterType::Mc);
        assert_eq!(data.subject, "Letter content");
        assert_eq!(data.key_points, vec!["x".repeat(200)]);
        assert_eq!(data.tone_detected, ToneDetected::Casual);
        assert_eq!(data.language_preference, Language::English);
        assert!(data.dates_mentioned.is_empty());
        assert_eq!(data.sender, ContactInfo::default());
    }

    #[test]
    fn test_fallback_on_unknown_variant() {
        let answer = ANSWER.replace("\"high\"", "\"urgent\"");
        let data = parse_structured_data(&answer, "short", LetterType::General);
        assert_eq!(data.subject, "Letter content");
        assert_eq!(data.key_points, vec!["short".to_string()]);
    }
}
