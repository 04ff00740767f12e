use actix_multipart::{Field, Multipart};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use catat_agents::transcriber::AudioClip;
use catat_agents::{CollaboratorError, LetterPipeline};
use futures::StreamExt;
use shared_types::{ErrorResponse, GenerateLetterResponse, Language, LetterType};
use std::sync::Arc;

use crate::config::UploadConfig;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Clone)]
pub struct GenerateAppState {
    pub pipeline: Arc<LetterPipeline>,
    pub upload: UploadConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    Validation(String),

    #[error("File too large. Max: {max_mb}MB")]
    TooLarge { max_mb: u64 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl actix_web::error::ResponseError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerateError::Validation(_) | GenerateError::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            GenerateError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GenerateError::Collaborator(err) => match err {
                CollaboratorError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                CollaboratorError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
                CollaboratorError::TranscriptTooShort => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[derive(Default)]
struct LetterForm {
    audio: Option<AudioClip>,
    language: Option<String>,
    letter_type: Option<String>,
}

/// Read a field to the end, stopping as soon as it exceeds `limit` bytes
async fn read_field(field: &mut Field, limit: Option<u64>) -> Result<Vec<u8>, GenerateError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| GenerateError::Validation(format!("Invalid multipart payload: {e}")))?;
        data.extend_from_slice(&chunk);
        if let Some(limit) = limit {
            if data.len() as u64 > limit {
                return Err(GenerateError::TooLarge {
                    max_mb: limit / BYTES_PER_MB,
                });
            }
        }
    }
    Ok(data)
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, GenerateError> {
    let data = read_field(field, Some(BYTES_PER_MB)).await?;
    String::from_utf8(data)
        .map(|text| text.trim().to_string())
        .map_err(|_| GenerateError::Validation(format!("Field {name} is not valid UTF-8")))
}

async fn read_form(mut payload: Multipart, upload: &UploadConfig) -> Result<LetterForm, GenerateError> {
    let max_bytes = upload.max_audio_size_mb * BYTES_PER_MB;
    let mut form = LetterForm::default();

    while let Some(field) = payload.next().await {
        let mut field = field
            .map_err(|e| GenerateError::Validation(format!("Invalid multipart payload: {e}")))?;

        let name = field.name().to_string();
        match name.as_str() {
            "audio" => {
                let content_type = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_string())
                    .unwrap_or_default();
                let filename = field
                    .content_disposition()
                    .get_filename()
                    .map(str::to_string);
                let bytes = read_field(&mut field, Some(max_bytes)).await?;
                form.audio = Some(AudioClip {
                    bytes,
                    filename,
                    content_type,
                });
            }
            "language" => form.language = Some(read_text(&mut field, &name).await?),
            "letter_type" => form.letter_type = Some(read_text(&mut field, &name).await?),
            other => {
                tracing::debug!("Ignoring unknown form field {}", other);
                read_field(&mut field, None).await?;
            }
        }
    }

    Ok(form)
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, GenerateError> {
    value.ok_or_else(|| GenerateError::Validation(format!("Missing form field: {name}")))
}

pub async fn generate_letter(
    state: web::Data<GenerateAppState>,
    payload: Multipart,
) -> Result<HttpResponse, GenerateError> {
    let form = read_form(payload, &state.upload).await?;

    let audio = required(form.audio, "audio")?;
    let language: Language = required(form.language, "language")?
        .parse()
        .map_err(|e: shared_types::ParseEnumError| GenerateError::Validation(e.to_string()))?;
    let letter_type: LetterType = required(form.letter_type, "letter_type")?
        .parse()
        .map_err(|e: shared_types::ParseEnumError| GenerateError::Validation(e.to_string()))?;

    if !state
        .upload
        .allowed_audio_types
        .iter()
        .any(|allowed| allowed == &audio.content_type)
    {
        return Err(GenerateError::UnsupportedFormat(audio.content_type));
    }

    tracing::info!(
        "Starting generation: {}, {}, {:.2}MB",
        letter_type,
        language,
        audio.bytes.len() as f64 / BYTES_PER_MB as f64
    );

    let generated = state
        .pipeline
        .generate_from_audio(audio, language, letter_type)
        .await
        .map_err(|err| {
            tracing::error!("Generation failed: {}", err);
            GenerateError::from(err)
        })?;

    tracing::info!("Generation completed successfully");
    Ok(HttpResponse::Ok().json(GenerateLetterResponse::from(generated)))
}
