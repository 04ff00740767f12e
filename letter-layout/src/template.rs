//! Schema template used when the letter writer returns bare body text.

use crate::markup::plain_text_to_markup;
use chrono::{Datelike, NaiveDate};
use shared_types::{Language, StructuredData};

const ENGLISH_MONTHS: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

const MALAY_MONTHS: [&str; 12] = [
    "JANUARI",
    "FEBRUARI",
    "MAC",
    "APRIL",
    "MEI",
    "JUN",
    "JULAI",
    "OGOS",
    "SEPTEMBER",
    "OKTOBER",
    "NOVEMBER",
    "DISEMBER",
];

const MALAY_OPENING: &str = "Dengan segala hormatnya";

/// Fixed wording of the letter schema for one language
struct Wording {
    salutation: &'static str,
    subject_label: &'static str,
    default_subject: &'static str,
    closing: &'static [&'static str],
    name_placeholder: &'static str,
    recipient_placeholder: &'static str,
}

const ENGLISH: Wording = Wording {
    salutation: "Dear Sir/Madam,",
    subject_label: "Subject:",
    default_subject: "Letter",
    closing: &["Yours faithfully,"],
    name_placeholder: "[Your Name]",
    recipient_placeholder: "[Recipient Name]",
};

const MALAY: Wording = Wording {
    salutation: "Tuan/Puan,",
    subject_label: "Perkara:",
    default_subject: "Surat",
    closing: &["Sekian, terima kasih.", "Yang benar,"],
    name_placeholder: "[Nama Anda]",
    recipient_placeholder: "[Penerima]",
};

fn wording(language: Language) -> &'static Wording {
    if language.is_malay() {
        &MALAY
    } else {
        &ENGLISH
    }
}

/// Letter date as `D MONTH YYYY` in capitals, e.g. `6 DISEMBER 2025`
pub fn format_letter_date(date: NaiveDate, language: Language) -> String {
    let months = if language.is_malay() {
        &MALAY_MONTHS
    } else {
        &ENGLISH_MONTHS
    };
    format!("{} {} {}", date.day(), months[date.month0() as usize], date.year())
}

fn looks_like_full_letter(content: &str) -> bool {
    content.contains("<p>")
        || content.contains("<hr>")
        || content.contains("Dear Sir/Madam")
        || content.contains("Tuan/Puan")
}

fn has_closing(content: &str) -> bool {
    ["Yours faithfully", "Yours sincerely", "Yang benar"]
        .iter()
        .any(|closing| content.contains(closing))
}

/// Always emitted, otherwise the classifier would take a body paragraph as recipient
fn contact_paragraph(lines: &[&str], placeholder: &str) -> String {
    if lines.is_empty() {
        format!("<p>{placeholder}</p>")
    } else {
        format!("<p>{}</p>", lines.join("<br>"))
    }
}

/// Wrap generated content in the letter schema.
///
/// Content that is already a full letter is only converted to markup. Bare
/// body text gets sender, separator, recipient, date, salutation, subject and
/// closing built from the structured data.
pub fn compose_letter(
    content: &str,
    structured: &StructuredData,
    language: Language,
    date: NaiveDate,
) -> String {
    if looks_like_full_letter(content) {
        return plain_text_to_markup(content);
    }

    tracing::debug!(language = %language, "Composing letter from template");
    let wording = wording(language);
    let mut parts: Vec<String> = Vec::new();

    parts.push(contact_paragraph(
        &structured.sender.sender_lines(),
        wording.name_placeholder,
    ));
    parts.push("<hr>".to_string());
    parts.push(contact_paragraph(
        &structured.recipient.recipient_lines(),
        wording.recipient_placeholder,
    ));
    parts.push(format!("<p>{}</p>", format_letter_date(date, language)));

    parts.push(format!("<p>{}</p>", wording.salutation));

    let subject = structured.subject.trim();
    let subject = if subject.is_empty() {
        wording.default_subject
    } else {
        subject
    };
    parts.push(format!("<p>{} {}</p>", wording.subject_label, subject));

    let body = content.trim();
    let body = if language.is_malay() && !body.starts_with(MALAY_OPENING) {
        format!("{MALAY_OPENING}, {body}")
    } else {
        body.to_string()
    };
    let body_markup = plain_text_to_markup(&body);
    if !body_markup.is_empty() {
        parts.push(body_markup);
    }

    if !has_closing(content) {
        parts.extend(wording.closing.iter().map(|line| format!("<p>{line}</p>")));
        let name = structured
            .sender
            .display_name()
            .unwrap_or(wording.name_placeholder);
        parts.push(format!("<p>{name}</p>"));
    }

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ContactInfo, LetterType, ToneDetected, UrgencyLevel};

    fn structured(sender_name: Option<&str>, subject: &str) -> StructuredData {
        StructuredData {
            letter_type: LetterType::Complaint,
            sender: ContactInfo {
                name: sender_name.map(str::to_string),
                address: Some("No. 5, Jalan Mawar".to_string()),
                ..ContactInfo::default()
            },
            recipient: ContactInfo {
                title: Some("Pengarah".to_string()),
                organization: Some("Majlis Perbandaran Klang".to_string()),
                ..ContactInfo::default()
            },
            subject: subject.to_string(),
            key_points: vec![],
            tone_detected: ToneDetected::Casual,
            language_preference: Language::Malay,
            dates_mentioned: vec![],
            urgency_level: UrgencyLevel::Low,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 6).unwrap()
    }

    #[test]
    fn test_format_letter_date() {
        assert_eq!(format_letter_date(date(), Language::English), "6 DECEMBER 2025");
        assert_eq!(format_letter_date(date(), Language::Malay), "6 DISEMBER 2025");
        assert_eq!(format_letter_date(date(), Language::Mixed), "6 DECEMBER 2025");

        let august = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        assert_eq!(format_letter_date(august, Language::Malay), "14 OGOS 2024");
    }

    #[test]
    fn test_full_letter_is_only_converted() {
        let content = "Ali\n\nDear Sir/Madam,\n\nBody";
        let out = compose_letter(content, &structured(None, ""), Language::English, date());
        assert_eq!(out, "<p>Ali</p>\n\n<p>Dear Sir/Madam,</p>\n\n<p>Body</p>");
    }

    #[test]
    fn test_malay_template() {
        let out = compose_letter(
            "saya ingin membuat aduan.",
            &structured(Some("Siti Aminah"), "Longkang tersumbat"),
            Language::Malay,
            date(),
        );

        let expected = [
            "<p>Siti Aminah<br>No. 5, Jalan Mawar</p>",
            "<hr>",
            "<p>Pengarah<br>Majlis Perbandaran Klang</p>",
            "<p>6 DISEMBER 2025</p>",
            "<p>Tuan/Puan,</p>",
            "<p>Perkara: Longkang tersumbat</p>",
            "<p>Dengan segala hormatnya, saya ingin membuat aduan.</p>",
            "<p>Sekian, terima kasih.</p>",
            "<p>Yang benar,</p>",
            "<p>Siti Aminah</p>",
        ];
        assert_eq!(out, expected.join("\n\n"));
    }

    #[test]
    fn test_english_template_defaults() {
        let out = compose_letter(
            "I am writing to report a broken streetlight.\n\nYours faithfully,",
            &structured(None, "  "),
            Language::English,
            date(),
        );

        assert!(out.contains("<p>Subject: Letter</p>"));
        assert!(out.contains("<p>Dear Sir/Madam,</p>"));
        assert_eq!(out.matches("Yours faithfully").count(), 1);
        assert!(!out.contains("[Your Name]"));
    }

    #[test]
    fn test_placeholders_for_missing_contacts() {
        let mut data = structured(None, "Cuti");
        data.sender = ContactInfo::default();
        data.recipient = ContactInfo::default();

        let out = compose_letter("Saya demam.", &data, Language::Malay, date());
        assert!(out.starts_with("<p>[Nama Anda]</p>\n\n<hr>\n\n<p>[Penerima]</p>\n\n<p>6 DISEMBER 2025</p>"));
    }

    #[test]
    fn test_name_placeholder() {
        let out = compose_letter("Body text.", &structured(None, "Leave"), Language::English, date());
        assert!(out.ends_with("<p>Yours faithfully,</p>\n\n<p>[Your Name]</p>"));
    }
}
