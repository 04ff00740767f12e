use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What the layout normalizer did with a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutOutcome {
    /// Blocks were reordered into the canonical schema
    Normalized,
    /// No paragraph blocks found, input returned as-is
    PassThrough,
    /// Normalization failed, input returned as-is
    Fallback,
}

/// Summary of the layout pass attached to API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct LayoutReport {
    pub outcome: LayoutOutcome,
    pub fallback_reason: Option<String>,
    /// Schema sections the final letter appears to lack ("separator", "subject", "salutation")
    pub missing_sections: Vec<String>,
}

/// Request to normalize an already generated letter
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct NormalizeLetterRequest {
    pub letter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct NormalizeLetterResponse {
    pub letter: String,
    pub plain_text: String,
    pub layout: LayoutReport,
}
