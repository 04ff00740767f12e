use crate::assembler::assemble;
use crate::audit::LayoutAudit;
use crate::blocks::extract_blocks;
use crate::classifier::classify_blocks;
use crate::error::LayoutError;
use shared_types::{LayoutOutcome, LayoutReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Normalized,
    /// No paragraph blocks, nothing to normalize
    PassThrough,
    /// Normalization failed and the input was kept
    Fallback(LayoutError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalization {
    pub markup: String,
    pub outcome: Outcome,
}

impl Normalization {
    pub fn report(&self, audit: &LayoutAudit) -> LayoutReport {
        let (outcome, fallback_reason) = match &self.outcome {
            Outcome::Normalized => (LayoutOutcome::Normalized, None),
            Outcome::PassThrough => (LayoutOutcome::PassThrough, None),
            Outcome::Fallback(err) => (LayoutOutcome::Fallback, Some(err.to_string())),
        };

        LayoutReport {
            outcome,
            fallback_reason,
            missing_sections: audit
                .missing_sections()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Rewrite letter markup into the canonical layout.
///
/// Never fails: markup without paragraphs, or markup the normalizer cannot
/// handle, is returned unchanged.
pub fn normalize(markup: &str) -> String {
    normalize_with_outcome(markup).markup
}

pub fn normalize_with_outcome(markup: &str) -> Normalization {
    match try_normalize(markup) {
        Ok(Some(normalized)) => Normalization {
            markup: normalized,
            outcome: Outcome::Normalized,
        },
        Ok(None) => {
            tracing::debug!("No paragraph blocks found, leaving letter unchanged");
            Normalization {
                markup: markup.to_string(),
                outcome: Outcome::PassThrough,
            }
        }
        Err(err) => {
            tracing::warn!("Letter layout normalization failed, keeping original: {}", err);
            Normalization {
                markup: markup.to_string(),
                outcome: Outcome::Fallback(err),
            }
        }
    }
}

fn try_normalize(markup: &str) -> Result<Option<String>, LayoutError> {
    let document = extract_blocks(markup)?;
    if document.is_empty() {
        return Ok(None);
    }

    let classified = classify_blocks(&document);
    assemble(&document, &classified).map(Some)
}
