use crate::blocks::SEPARATOR_REGEX;

const SUBJECT_MARKERS: &[&str] = &["Subject:", "Perkara:", "Re:", "Rujukan:"];
const SALUTATION_MARKERS: &[&str] = &["Dear ", "Tuan", "Puan"];

/// Presence of the schema sections a reviewer expects in a finished letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutAudit {
    pub has_separator: bool,
    pub has_subject: bool,
    pub has_salutation: bool,
}

impl LayoutAudit {
    pub fn missing_sections(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_separator {
            missing.push("separator");
        }
        if !self.has_subject {
            missing.push("subject");
        }
        if !self.has_salutation {
            missing.push("salutation");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.has_separator && self.has_subject && self.has_salutation
    }
}

/// Check a letter for separator, subject line and salutation, warning on each gap
pub fn audit_layout(markup: &str) -> LayoutAudit {
    let audit = LayoutAudit {
        has_separator: SEPARATOR_REGEX.is_match(markup) || markup.contains("---"),
        has_subject: SUBJECT_MARKERS.iter().any(|marker| markup.contains(marker)),
        has_salutation: SALUTATION_MARKERS.iter().any(|marker| markup.contains(marker)),
    };

    if !audit.has_separator {
        tracing::warn!("Letter may be missing horizontal separator line (<hr>)");
    }
    if !audit.has_subject {
        tracing::warn!("Letter may be missing subject line");
    }
    if !audit.has_salutation {
        tracing::warn!("Letter may be missing salutation (Dear Sir/Madam or Tuan/Puan)");
    }

    audit
}
