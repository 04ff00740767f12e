use regex::Regex;
use std::sync::LazyLock;

/// Opening tag of the right-float marker written around dates
pub const RIGHT_FLOAT_OPEN: &str = r#"<span style="float: right;">"#;
pub const RIGHT_FLOAT_CLOSE: &str = "</span>";

static DATE_PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\s*(?:date|tarikh)\b[^\]]*\]").expect("valid date placeholder regex")
});

// English and Malay month names, full or abbreviated.
static DAY_MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b\d{1,2}(?:st|nd|rd|th)?\s+",
        r"(?:",
        r"jan(?:uary|uari)?|feb(?:ruary|ruari)?|mar(?:ch)?|mac|apr(?:il)?|",
        r"may|mei|june?|jul(?:y|ai)?|aug(?:ust)?|ogos|sept?(?:ember)?|",
        r"oct(?:ober)?|okt(?:ober)?|nov(?:ember)?|dec(?:ember)?|dis(?:ember)?",
        r")\b"
    ))
    .expect("valid day-month regex")
});

static SALUTATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdear\s|\btuan\b|\bpuan\b|\bsir\s*/\s*madam\b").expect("valid salutation regex")
});

static SUBJECT_LEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:subject|perkara|re|rujukan)\s*:").expect("valid subject regex")
});

static SUBJECT_EMPHASIS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<(?:strong|b|u)(?:\s[^>]*)?>|\*\*)\s*(?:subject|perkara|re|rujukan)\s*:")
        .expect("valid subject emphasis regex")
});

static RIGHT_FLOAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<span\b[^>]*\bfloat\s*:\s*right[^>]*>(.*?)</span\s*>")
        .expect("valid right-float regex")
});

const CLOSING_PHRASES: &[&str] = &[
    "yours faithfully",
    "yours sincerely",
    "yours truly",
    "sincerely",
    "regards",
    "yang benar",
    "yang menurut perintah",
    "sekian, terima kasih",
    "sekian terima kasih",
    "terima kasih",
];

/// Placeholder token or "day month" with an English or Malay month
pub fn is_date(text: &str) -> bool {
    DATE_PLACEHOLDER_REGEX.is_match(text) || DAY_MONTH_REGEX.is_match(text)
}

pub fn is_salutation(text: &str) -> bool {
    SALUTATION_REGEX.is_match(text)
}

/// Heading marker at the start of the visible text, or emphasised anywhere in the markup
pub fn is_subject(text: &str, inner_markup: &str) -> bool {
    let leading = text.trim_start_matches(|c: char| c == '*' || c.is_whitespace());
    SUBJECT_LEADING_REGEX.is_match(leading) || SUBJECT_EMPHASIS_REGEX.is_match(inner_markup)
}

pub fn is_closing(text: &str) -> bool {
    let lower = text.to_lowercase();
    text.chars().count() < 50 && CLOSING_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Block content split around its first right-float span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatSplit {
    /// Content outside the span, trimmed
    pub outside: String,
    /// Content of the span, trimmed
    pub floated: Option<String>,
}

impl FloatSplit {
    pub fn has_outside(&self) -> bool {
        !self.outside.is_empty()
    }
}

pub fn split_right_float(inner_markup: &str) -> FloatSplit {
    match RIGHT_FLOAT_REGEX.captures(inner_markup) {
        Some(caps) => {
            let (Some(whole), Some(floated)) = (caps.get(0), caps.get(1)) else {
                return unfloated(inner_markup);
            };
            let outside = format!(
                "{}{}",
                &inner_markup[..whole.start()],
                &inner_markup[whole.end()..]
            );
            FloatSplit {
                outside: outside.trim().to_string(),
                floated: Some(floated.as_str().trim().to_string()),
            }
        }
        None => unfloated(inner_markup),
    }
}

fn unfloated(inner_markup: &str) -> FloatSplit {
    FloatSplit {
        outside: inner_markup.trim().to_string(),
        floated: None,
    }
}

pub fn wrap_right_float(content: &str) -> String {
    format!("{RIGHT_FLOAT_OPEN}{content}{RIGHT_FLOAT_CLOSE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_in_both_languages() {
        assert!(is_date("6 December 2025"));
        assert!(is_date("6 DISEMBER 2025"));
        assert!(is_date("14 Ogos 2025"));
        assert!(is_date("1st March"));
        assert!(is_date("3 Mac 2024"));
        assert!(is_date("Kuala Lumpur, 21 Sept 2025"));
        assert!(is_date("[DATE]"));
        assert!(is_date("[Tarikh: DD Bulan YYYY]"));
        assert!(is_date("[Date: 6 December 2025]"));
    }

    #[test]
    fn test_non_dates() {
        assert!(!is_date("Tel: 012-345 6789"));
        assert!(!is_date("We bought 3 marbles"));
        assert!(!is_date("Room 12 Level 3"));
        assert!(!is_date("[SENDER_NAME]"));
    }

    #[test]
    fn test_salutations() {
        assert!(is_salutation("Dear Sir/Madam,"));
        assert!(is_salutation("Tuan/Puan,"));
        assert!(is_salutation("Yang Berhormat Tuan,"));
        assert!(!is_salutation("Jabatan Pengangkutan Jalan"));
        assert!(!is_salutation("Dearborn Street"));
    }

    #[test]
    fn test_subjects() {
        assert!(is_subject("Subject: Broken streetlight", "Subject: Broken streetlight"));
        assert!(is_subject("PERKARA: Cuti sakit", "PERKARA: Cuti sakit"));
        assert!(is_subject(
            "Re: Complaint",
            "<strong>Re: Complaint</strong>"
        ));
        assert!(is_subject("**Subject: Leave**", "**Subject: Leave**"));
        assert!(is_subject(
            "Tajuk Rujukan: JPJ/2025",
            "Tajuk <u>Rujukan: JPJ/2025</u>"
        ));
        assert!(!is_subject(
            "Please refer to the subject: drainage",
            "Please refer to the subject: drainage"
        ));
    }

    #[test]
    fn test_closings() {
        assert!(is_closing("Yours faithfully,"));
        assert!(is_closing("Sekian, terima kasih."));
        assert!(!is_closing(
            "Terima kasih atas perhatian pihak tuan terhadap perkara yang amat penting ini."
        ));
    }

    #[test]
    fn test_split_right_float() {
        let split = split_right_float(
            r#"Jane Doe<br>Jabatan Kerja Raya <span style="float:right">6 December 2025</span>"#,
        );
        assert_eq!(split.outside, "Jane Doe<br>Jabatan Kerja Raya");
        assert_eq!(split.floated.as_deref(), Some("6 December 2025"));
        assert!(split.has_outside());

        let split = split_right_float(" 6 December 2025 ");
        assert_eq!(split.outside, "6 December 2025");
        assert_eq!(split.floated, None);
    }

    #[test]
    fn test_wrap_right_float_is_recognised() {
        let wrapped = wrap_right_float("6 Dis 2025");
        let split = split_right_float(&wrapped);
        assert_eq!(split.floated.as_deref(), Some("6 Dis 2025"));
        assert!(!split.has_outside());
    }
}
