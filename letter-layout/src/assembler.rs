use crate::blocks::{Block, Document};
use crate::classifier::{split_right_float, wrap_right_float, ClassifiedBlock, Role};
use crate::error::LayoutError;

/// Separator written between the sender and recipient sections
pub const SEPARATOR: &str = "<hr>";

const BLOCK_SPACING: &str = "\n\n";

/// Rebuild the letter in canonical order:
/// sender, separator, recipient with floated date, then everything else as found.
pub fn assemble(document: &Document, classified: &[ClassifiedBlock]) -> Result<String, LayoutError> {
    if classified.len() != document.blocks.len() {
        return Err(LayoutError::RoleMismatch {
            expected: document.blocks.len(),
            classified: classified.len(),
        });
    }

    let sender = classified
        .first()
        .filter(|c| c.role == Role::Sender)
        .ok_or(LayoutError::MissingSender)?;
    let recipient = classified.iter().find(|c| c.role == Role::Recipient);
    let date = classified.iter().find(|c| c.role == Role::Date);

    let mut parts: Vec<String> = Vec::with_capacity(classified.len() + 2);
    parts.extend(document.fragments_before(0).map(str::to_string));
    parts.push(sender.block.raw_markup.clone());

    if document.has_separator {
        tracing::debug!("Placing existing separator after sender");
    } else {
        tracing::debug!("Inserting missing separator after sender");
    }
    parts.push(SEPARATOR.to_string());

    let recipient_block = recipient.map(|c| &c.block);
    let date_block = date.map(|c| &c.block);
    if let Some(merged) = merge_recipient_and_date(recipient_block, date_block) {
        parts.push(merged);
    }

    let mut consumed: Vec<usize> = [recipient_block, date_block]
        .into_iter()
        .flatten()
        .map(|b| b.position)
        .collect();
    consumed.sort_unstable();
    for position in consumed {
        parts.extend(document.fragments_before(position).map(str::to_string));
    }

    for item in classified
        .iter()
        .filter(|c| !matches!(c.role, Role::Sender | Role::Recipient | Role::Date))
    {
        parts.extend(document.fragments_before(item.block.position).map(str::to_string));
        parts.push(item.block.raw_markup.clone());
    }

    parts.extend(
        document
            .fragments_before(document.blocks.len())
            .map(str::to_string),
    );

    Ok(parts.join(BLOCK_SPACING))
}

/// Co-locate recipient and date in one paragraph with the date floated right.
///
/// A date paragraph that was merged on an earlier run contributes the content
/// outside its float span to the recipient side, so merging twice is stable.
pub fn merge_recipient_and_date(recipient: Option<&Block>, date: Option<&Block>) -> Option<String> {
    let date_split = date.map(|b| split_right_float(&b.inner_content));

    let mut recipient_parts: Vec<String> = Vec::new();
    if let Some(block) = recipient {
        let content = block.inner_content.trim();
        if !content.is_empty() {
            recipient_parts.push(content.to_string());
        }
    }

    let date_content = match date_split {
        Some(split) if split.floated.is_some() => {
            if split.has_outside() {
                recipient_parts.push(split.outside);
            }
            split.floated
        }
        Some(split) => Some(split.outside),
        None => None,
    };
    let date_content = date_content.filter(|content| !content.is_empty());

    let recipient_content = if recipient_parts.is_empty() {
        None
    } else {
        Some(recipient_parts.join("<br>"))
    };

    match (recipient_content, date_content) {
        (Some(recipient), Some(date)) => Some(format!("<p>{}{}</p>", recipient, wrap_right_float(&date))),
        (Some(recipient), None) => Some(format!("<p>{}</p>", recipient)),
        (None, Some(date)) => Some(format!("<p>{}</p>", wrap_right_float(&date))),
        (None, None) => None,
    }
}
