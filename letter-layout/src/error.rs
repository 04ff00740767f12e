/// Conditions that stop a letter from being normalized.
///
/// None of these reach callers of [`crate::normalize`]; the boundary logs them
/// and returns the original markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Unterminated paragraph tag at byte {offset}")]
    UnterminatedParagraph { offset: usize },

    #[error("Closing paragraph tag without an opening tag at byte {offset}")]
    StrayClosingTag { offset: usize },

    #[error("Paragraph {position} contains a nested paragraph tag")]
    NestedParagraph { position: usize },

    #[error("Classified {classified} blocks but the document has {expected}")]
    RoleMismatch { expected: usize, classified: usize },

    #[error("First block is not classified as the sender")]
    MissingSender,
}
