use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Error returned when a form or CLI value does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Kind of letter the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum LetterType {
    Complaint,
    Proposal,
    Mc,
    General,
    Official,
}

impl LetterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterType::Complaint => "complaint",
            LetterType::Proposal => "proposal",
            LetterType::Mc => "mc",
            LetterType::General => "general",
            LetterType::Official => "official",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LetterType::Complaint => "Complaint Letter",
            LetterType::Proposal => "Proposal Letter",
            LetterType::Mc => "Medical Certificate Letter",
            LetterType::General => "General Letter",
            LetterType::Official => "Official Letter",
        }
    }
}

impl fmt::Display for LetterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "complaint" => Ok(LetterType::Complaint),
            "proposal" => Ok(LetterType::Proposal),
            "mc" => Ok(LetterType::Mc),
            "general" => Ok(LetterType::General),
            "official" => Ok(LetterType::Official),
            _ => Err(ParseEnumError {
                kind: "letter_type",
                value: s.to_string(),
            }),
        }
    }
}

/// Letter language. `Mixed` is Manglish input written out as English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ms")]
    Malay,
    #[serde(rename = "mixed")]
    Mixed,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Malay => "ms",
            Language::Mixed => "mixed",
        }
    }

    /// Language name used when instructing the letter writer
    pub fn letter_language_name(&self) -> &'static str {
        match self {
            Language::Malay => "Bahasa Malaysia",
            Language::English | Language::Mixed => "English",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Malay => "Bahasa Malaysia",
            Language::Mixed => "Mixed (Manglish)",
        }
    }

    /// Language code sent to speech recognition, which has no mixed mode
    pub fn transcription_hint(&self) -> &'static str {
        match self {
            Language::Malay => "ms",
            Language::English | Language::Mixed => "en",
        }
    }

    pub fn is_malay(&self) -> bool {
        matches!(self, Language::Malay)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::English),
            "ms" => Ok(Language::Malay),
            "mixed" => Ok(Language::Mixed),
            _ => Err(ParseEnumError {
                kind: "language",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum ToneDetected {
    Casual,
    Manglish,
    Formal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

/// Sender or recipient details as extracted from the transcript.
/// Missing values arrive either absent or as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
}

impl ContactInfo {
    /// Sender lines in letter order: name, address, contact
    pub fn sender_lines(&self) -> Vec<&str> {
        [&self.name, &self.address, &self.contact]
            .into_iter()
            .filter_map(|field| non_empty(field))
            .collect()
    }

    /// Recipient lines in letter order: name, title, organization, address
    pub fn recipient_lines(&self) -> Vec<&str> {
        [&self.name, &self.title, &self.organization, &self.address]
            .into_iter()
            .filter_map(|field| non_empty(field))
            .collect()
    }

    pub fn display_name(&self) -> Option<&str> {
        non_empty(&self.name)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Structured record extracted from a speech transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct StructuredData {
    pub letter_type: LetterType,
    pub sender: ContactInfo,
    pub recipient: ContactInfo,
    pub subject: String,
    pub key_points: Vec<String>,
    pub tone_detected: ToneDetected,
    pub language_preference: Language,
    #[serde(default)]
    pub dates_mentioned: Vec<String>,
    pub urgency_level: UrgencyLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LetterMetadata {
    pub language: Language,
    pub letter_type: LetterType,
    pub tone_detected: Option<ToneDetected>,
    pub urgency: Option<UrgencyLevel>,
}

/// Response for the generate-letter endpoint
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct GenerateLetterResponse {
    pub success: bool,
    pub transcript: String,
    pub structured_data: StructuredData,
    pub letter: String,
    pub metadata: LetterMetadata,
    pub layout: crate::LayoutReport,
}
