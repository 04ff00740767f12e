use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod layout;
pub mod letter;

pub use layout::{LayoutOutcome, LayoutReport, NormalizeLetterRequest, NormalizeLetterResponse};
pub use letter::{
    ContactInfo, GenerateLetterResponse, Language, LetterMetadata, LetterType, ParseEnumError,
    StructuredData, ToneDetected, UrgencyLevel,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response for the health endpoint
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}
