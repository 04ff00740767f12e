//! Recording to finished letter: transcribe, structure, write, lay out.

use crate::error::CollaboratorError;
use crate::letter_structurer::LetterStructurer;
use crate::letter_writer::LetterWriter;
use crate::transcriber::{accept_transcript, AudioClip, Transcriber};
use chrono::NaiveDate;
use letter_layout::{audit_layout, compose_letter, normalize_with_outcome, strip_code_fence};
use shared_types::{
    GenerateLetterResponse, Language, LayoutReport, LetterMetadata, LetterType, StructuredData,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GeneratedLetter {
    pub transcript: String,
    pub structured_data: StructuredData,
    pub letter: String,
    pub metadata: LetterMetadata,
    pub layout: LayoutReport,
}

impl From<GeneratedLetter> for GenerateLetterResponse {
    fn from(generated: GeneratedLetter) -> Self {
        GenerateLetterResponse {
            success: true,
            transcript: generated.transcript,
            structured_data: generated.structured_data,
            letter: generated.letter,
            metadata: generated.metadata,
            layout: generated.layout,
        }
    }
}

/// Turn raw writer output into the final letter and its layout report
pub fn finalize_letter(
    raw: &str,
    structured: &StructuredData,
    language: Language,
    date: NaiveDate,
) -> (String, LayoutReport) {
    let content = strip_code_fence(raw);
    let composed = compose_letter(&content, structured, language, date);
    let normalization = normalize_with_outcome(&composed);
    let audit = audit_layout(&normalization.markup);
    let report = normalization.report(&audit);
    (normalization.markup, report)
}

pub struct LetterPipeline {
    transcriber: Arc<dyn Transcriber>,
    structurer: LetterStructurer,
    writer: LetterWriter,
}

impl LetterPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        structurer: LetterStructurer,
        writer: LetterWriter,
    ) -> Self {
        Self {
            transcriber,
            structurer,
            writer,
        }
    }

    pub async fn generate_from_audio(
        &self,
        clip: AudioClip,
        language: Language,
        letter_type: LetterType,
    ) -> Result<GeneratedLetter, CollaboratorError> {
        tracing::info!("Step 1/3: Transcribing");
        let transcript = self.transcriber.transcribe(clip, language).await?;
        self.generate_from_transcript(&transcript, language, letter_type)
            .await
    }

    pub async fn generate_from_transcript(
        &self,
        transcript: &str,
        language: Language,
        letter_type: LetterType,
    ) -> Result<GeneratedLetter, CollaboratorError> {
        let transcript = accept_transcript(transcript)?;

        tracing::info!("Step 2/3: Structuring");
        let structured_data = self.structurer.structure(&transcript, letter_type).await?;

        tracing::info!("Step 3/3: Generating letter");
        let raw = self
            .writer
            .write(&structured_data, language, letter_type)
            .await?;

        let today = chrono::Local::now().date_naive();
        let (letter, layout) = finalize_letter(&raw, &structured_data, language, today);
        tracing::info!(outcome = ?layout.outcome, "Letter ready");

        let metadata = LetterMetadata {
            language,
            letter_type,
            tone_detected: Some(structured_data.tone_detected),
            urgency: Some(structured_data.urgency_level),
        };

        Ok(GeneratedLetter {
            transcript,
            structured_data,
            letter,
            metadata,
            layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter_structurer::fallback_record;
    use crate::llm::{CompletionRequest, CompletionResponse, LlmClient};
    use async_trait::async_trait;
    use shared_types::LayoutOutcome;

    struct FixedTranscriber(&'static str);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(
            &self,
            _clip: AudioClip,
            _language: Language,
        ) -> Result<String, CollaboratorError> {
            accept_transcript(self.0)
        }
    }

    struct FixedClient(&'static str);

    #[async_trait]
    impl LlmClient for FixedClient {
        fn provider(&self) -> &'static str {
            "fixed"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, CollaboratorError> {
            Ok(CompletionResponse {
                text: self.0.to_string(),
                model: request.model,
                stop_reason: None,
            })
        }
    }

    struct RateLimitedClient;

    #[async_trait]
    impl LlmClient for RateLimitedClient {
        fn provider(&self) -> &'static str {
            "Groq"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, CollaboratorError> {
            Err(CollaboratorError::RateLimited { provider: "Groq" })
        }
    }

    const WRITER_ANSWER: &str = "```html
<p>Ali bin Abu<br>No. 3, Jalan Ros</p>
<p>6 December 2025</p>
<p>The Director<br>MBPJ</p>
<p>Dear Sir/Madam,</p>
<p>Subject: Blocked drain</p>
<p>The drain outside my house has been blocked for two weeks.</p>
<p>Yours faithfully,</p>
<p>Ali bin Abu</p>
```";

    fn audio() -> AudioClip {
        AudioClip {
            bytes: vec![1, 2, 3],
            filename: Some("aduan.webm".to_string()),
            content_type: "audio/webm".to_string(),
        }
    }

    fn pipeline(transcript: &'static str, llm: Arc<dyn LlmClient>) -> LetterPipeline {
        LetterPipeline::new(
            Arc::new(FixedTranscriber(transcript)),
            LetterStructurer::new(llm.clone()),
            LetterWriter::new(llm),
        )
    }

    #[tokio::test]
    async fn test_generate_from_audio() {
        let pipeline = pipeline("the drain is blocked lah", Arc::new(FixedClient(WRITER_ANSWER)));

        let generated = pipeline
            .generate_from_audio(audio(), Language::Mixed, LetterType::Complaint)
            .await
            .unwrap();

        assert_eq!(generated.transcript, "the drain is blocked lah");
        // The canned answer is not JSON, so the structurer falls back
        assert_eq!(generated.structured_data.subject, "Letter content");
        assert_eq!(generated.layout.outcome, LayoutOutcome::Normalized);
        assert!(generated.layout.missing_sections.is_empty());
        assert!(generated.letter.starts_with("<p>Ali bin Abu<br>No. 3, Jalan Ros</p>\n\n<hr>\n\n"));
        assert!(generated.letter.contains(
            "<p>The Director<br>MBPJ<span style=\"float: right;\">6 December 2025</span></p>"
        ));
        assert_eq!(generated.metadata.language, Language::Mixed);

        let response: GenerateLetterResponse = generated.into();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_short_transcript_rejected() {
        let pipeline = pipeline("ok", Arc::new(FixedClient(WRITER_ANSWER)));
        let err = pipeline
            .generate_from_audio(audio(), Language::English, LetterType::General)
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::TranscriptTooShort));
    }

    #[tokio::test]
    async fn test_rate_limit_propagates() {
        let pipeline = pipeline("the drain is blocked lah", Arc::new(RateLimitedClient));
        let err = pipeline
            .generate_from_transcript("the drain is blocked lah", Language::English, LetterType::Complaint)
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::RateLimited { .. }));
    }

    #[test]
    fn test_finalize_bare_body_uses_template() {
        let structured = fallback_record("saya nak cuti", LetterType::Mc);
        let date = NaiveDate::from_ymd_opt(2025, 12, 6).unwrap();

        let (letter, report) = finalize_letter(
            "Saya ingin memohon cuti sakit.",
            &structured,
            Language::Malay,
            date,
        );

        assert_eq!(report.outcome, LayoutOutcome::Normalized);
        assert!(letter.starts_with("<p>[Nama Anda]</p>\n\n<hr>\n\n"));
        assert!(letter.contains("<p>[Penerima]<span style=\"float: right;\">6 DISEMBER 2025</span></p>"));
        assert!(letter.contains("<p>Perkara: Letter content</p>"));
        assert!(letter.ends_with("<p>Yang benar,</p>\n\n<p>[Nama Anda]</p>"));
    }
}
