//! Conversions between model output, letter markup and plain text.

use crate::blocks::SEPARATOR_REGEX;
use regex::Regex;
use std::sync::LazyLock;

static BLANK_LINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank line regex"));

static RULE_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-_=]{3,}$").expect("valid rule line regex"));

static PARAGRAPH_BOUNDARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</p\s*>\s*<p(?:\s[^>]*)?>").expect("valid paragraph boundary regex")
});

static OPEN_PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>").expect("valid opening tag regex"));

static CLOSE_PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>").expect("valid closing tag regex"));

static LINE_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));

static RIGHT_FLOAT_OPEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<span\b[^>]*\bfloat\s*:\s*right[^>]*>").expect("valid float span regex")
});

static ANY_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

static EXCESS_NEWLINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

static CODE_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)(?:```|\z)").expect("valid code fence regex")
});

/// Whether the text already carries paragraph, break or separator markup
pub fn has_markup(text: &str) -> bool {
    text.contains("<p>") || text.contains("<br>") || text.contains("<hr>")
}

/// Turn a plain-text letter into paragraph markup.
///
/// Blank lines separate paragraphs, single newlines become `<br>`, and lines
/// made only of `-`, `_` or `=` become the separator. Text that already has
/// markup is returned unchanged.
pub fn plain_text_to_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    if has_markup(text) {
        return text.to_string();
    }

    let normalized = text.replace("\r\n", "\n");
    BLANK_LINES_REGEX
        .split(&normalized)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| {
            if RULE_LINE_REGEX.is_match(paragraph) {
                "<hr>".to_string()
            } else {
                format!("<p>{}</p>", paragraph.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Plain-text rendering of letter markup for export.
///
/// The floated date is kept on the recipient's last line, separated by a tab.
pub fn markup_to_plain_text(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }

    let text = SEPARATOR_REGEX.replace_all(markup, "\n---\n");
    let text = PARAGRAPH_BOUNDARY_REGEX.replace_all(&text, "\n\n");
    let text = OPEN_PARAGRAPH_REGEX.replace_all(&text, "");
    let text = CLOSE_PARAGRAPH_REGEX.replace_all(&text, "\n\n");
    let text = LINE_BREAK_REGEX.replace_all(&text, "\n");
    let text = RIGHT_FLOAT_OPEN_REGEX.replace_all(&text, "\t");
    let text = ANY_TAG_REGEX.replace_all(&text, "");
    let text = text.replace("**", "");
    let text = html_escape::decode_html_entities(&text);
    let text = EXCESS_NEWLINES_REGEX.replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Remove a Markdown code fence wrapped around a model answer
pub fn strip_code_fence(text: &str) -> String {
    match CODE_FENCE_REGEX.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_to_markup() {
        let text = "Ali bin Abu\nNo. 3, Jalan Ros\n\n---\n\nDear Sir/Madam,\n\n\nI am writing to you.";
        assert_eq!(
            plain_text_to_markup(text),
            "<p>Ali bin Abu<br>No. 3, Jalan Ros</p>\n\n<hr>\n\n<p>Dear Sir/Madam,</p>\n\n<p>I am writing to you.</p>"
        );
    }

    #[test]
    fn test_plain_text_to_markup_leaves_markup_alone() {
        let markup = "<p>Already</p>\n<p>markup</p>";
        assert_eq!(plain_text_to_markup(markup), markup);
        assert_eq!(plain_text_to_markup(""), "");
    }

    #[test]
    fn test_markup_to_plain_text() {
        let markup = "<p>Sender<br>Address</p>\n\n<hr>\n\n<p>Jane Doe<span style=\"float: right;\">6 December 2025</span></p>\n\n<p><strong>Subject:</strong> Tom &amp; Jerry</p>\n\n<p>**Body**</p>";
        assert_eq!(
            markup_to_plain_text(markup),
            "Sender\nAddress\n\n---\n\nJane Doe\t6 December 2025\n\nSubject: Tom & Jerry\n\nBody"
        );
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("Sure!\n```html\n<p>Hi</p>\n```\nDone"), "<p>Hi</p>");
        assert_eq!(strip_code_fence("```\n<p>Hi</p>"), "<p>Hi</p>");
        assert_eq!(strip_code_fence("  <p>No fence</p>\n"), "<p>No fence</p>");
    }
}
