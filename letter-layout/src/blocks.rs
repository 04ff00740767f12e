//! Paragraph-block tokenizer.
//!
//! Splits generated letter markup into `<p>` blocks. This is deliberately not a
//! markup parser: the input is the narrow paragraph/break/separator subset the
//! letter writer produces, and anything between paragraph pairs is carried
//! through untouched as loose fragments.

use crate::error::LayoutError;
use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p\s*>").expect("valid paragraph regex")
});

static OPEN_PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>").expect("valid opening tag regex"));

static CLOSE_PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>").expect("valid closing tag regex"));

pub(crate) static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<hr(?:\s[^>]*)?/?>").expect("valid separator regex"));

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// One paragraph-level unit of letter markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Opening tag through closing tag, exactly as found
    pub raw_markup: String,
    /// Markup between the paragraph tags
    pub inner_content: String,
    /// Index in the extracted sequence
    pub position: usize,
}

impl Block {
    /// Visible text of the block: tags removed, entities decoded, whitespace collapsed
    pub fn plain_text(&self) -> String {
        visible_text(&self.inner_content)
    }
}

/// Text found between paragraph blocks, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseFragment {
    /// Position of the block this fragment precedes, or the block count for trailing text
    pub before: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub fragments: Vec<LooseFragment>,
    /// Whether a separator token appears anywhere in the source
    pub has_separator: bool,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn fragments_before(&self, position: usize) -> impl Iterator<Item = &str> + '_ {
        self.fragments
            .iter()
            .filter(move |fragment| fragment.before == position)
            .map(|fragment| fragment.text.as_str())
    }
}

/// Split markup into paragraph blocks.
///
/// Returns an empty document when no paragraph pair is found; that is not an
/// error and callers pass the input through. Malformed paragraph tags around or
/// inside the found blocks are reported as [`LayoutError`].
pub fn extract_blocks(markup: &str) -> Result<Document, LayoutError> {
    let has_separator = SEPARATOR_REGEX.is_match(markup);
    let matches: Vec<_> = PARAGRAPH_REGEX.captures_iter(markup).collect();

    if matches.is_empty() {
        return Ok(Document {
            has_separator,
            ..Document::default()
        });
    }

    let mut blocks = Vec::with_capacity(matches.len());
    let mut fragments = Vec::new();
    let mut cursor = 0;

    for caps in &matches {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let position = blocks.len();

        if OPEN_PARAGRAPH_REGEX.is_match(inner) {
            return Err(LayoutError::NestedParagraph { position });
        }

        if let Some(text) = loose_text(markup, cursor, whole.start())? {
            fragments.push(LooseFragment {
                before: position,
                text,
            });
        }
        cursor = whole.end();

        // A paragraph wrapping only a separator is a separator, not a block
        if is_separator_only(inner) {
            continue;
        }

        blocks.push(Block {
            raw_markup: whole.as_str().to_string(),
            inner_content: inner.to_string(),
            position,
        });
    }

    if let Some(text) = loose_text(markup, cursor, markup.len())? {
        fragments.push(LooseFragment {
            before: blocks.len(),
            text,
        });
    }

    tracing::debug!(
        blocks = blocks.len(),
        fragments = fragments.len(),
        has_separator,
        "Extracted letter blocks"
    );

    Ok(Document {
        blocks,
        fragments,
        has_separator,
    })
}

/// Validate the gap between two blocks and return its content with separators removed
fn loose_text(markup: &str, start: usize, end: usize) -> Result<Option<String>, LayoutError> {
    let gap = &markup[start..end];

    if let Some(open) = OPEN_PARAGRAPH_REGEX.find(gap) {
        return Err(LayoutError::UnterminatedParagraph {
            offset: start + open.start(),
        });
    }
    if let Some(close) = CLOSE_PARAGRAPH_REGEX.find(gap) {
        return Err(LayoutError::StrayClosingTag {
            offset: start + close.start(),
        });
    }

    let without_separators = SEPARATOR_REGEX.replace_all(gap, "");
    let text = without_separators.trim();
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text.to_string()))
    }
}

fn is_separator_only(inner: &str) -> bool {
    SEPARATOR_REGEX.is_match(inner) && visible_text(&SEPARATOR_REGEX.replace_all(inner, "")).is_empty()
}

pub(crate) fn visible_text(markup: &str) -> String {
    let stripped = TAG_REGEX.replace_all(markup, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
