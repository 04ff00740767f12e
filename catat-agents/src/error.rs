use reqwest::StatusCode;

/// Failures of the upstream AI collaborators, grouped by how callers react to them
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Rate limit reached. Please wait.")]
    RateLimited { provider: &'static str },

    #[error("Invalid {provider} API key.")]
    Unauthorized { provider: &'static str },

    #[error("Transcription too short. Please record more details.")]
    TranscriptTooShort,

    #[error("{provider} request failed ({status}): {message}")]
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    #[error("Failed to reach {provider}: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CollaboratorError {
    /// Map a non-success HTTP status from a provider to an error category
    pub fn from_status(provider: &'static str, status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => CollaboratorError::RateLimited { provider },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CollaboratorError::Unauthorized { provider }
            }
            _ => CollaboratorError::Upstream {
                provider,
                status: status.as_u16(),
                message: body,
            },
        }
    }

    pub fn transport(provider: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| CollaboratorError::Transport { provider, source }
    }

    pub fn decode(provider: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |err| CollaboratorError::Decode {
            provider,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            CollaboratorError::from_status("groq", StatusCode::TOO_MANY_REQUESTS, String::new()),
            CollaboratorError::RateLimited { provider: "groq" }
        ));
        assert!(matches!(
            CollaboratorError::from_status("anthropic", StatusCode::UNAUTHORIZED, String::new()),
            CollaboratorError::Unauthorized { .. }
        ));
        assert!(matches!(
            CollaboratorError::from_status("anthropic", StatusCode::FORBIDDEN, String::new()),
            CollaboratorError::Unauthorized { .. }
        ));

        let err = CollaboratorError::from_status(
            "groq",
            StatusCode::BAD_GATEWAY,
            "upstream down".to_string(),
        );
        assert_eq!(err.to_string(), "groq request failed (502): upstream down");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CollaboratorError::Unauthorized { provider: "Groq" }.to_string(),
            "Invalid Groq API key."
        );
        assert_eq!(
            CollaboratorError::TranscriptTooShort.to_string(),
            "Transcription too short. Please record more details."
        );
    }
}
