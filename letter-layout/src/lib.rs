//! Letter Layout Crate
//!
//! This crate rewrites generated Malaysian formal-letter markup into the
//! canonical layout expected by the PDF renderer: sender, a single separator,
//! recipient with the date floated right, then the rest of the letter in its
//! original order.
//!
//! # Architecture
//!
//! - **Block Extractor** (`blocks`): splits markup into `<p>` blocks
//! - **Classifier** (`classifier`): assigns each block a role from an ordered rule table
//! - **Assembler** (`assembler`): re-emits the blocks in canonical order
//! - **Normalizer** (`normalizer`): the public entry point, never fails
//!
//! Supporting modules convert between markup and plain text (`markup`), check
//! a finished letter for missing sections (`audit`) and build the schema
//! around bare body text (`template`).
//!
//! # Example
//!
//! ```rust,ignore
//! use letter_layout::normalize;
//!
//! let letter = normalize("<p>Ali</p><p>6 Disember 2025</p><p>Pengarah</p>");
//! assert!(letter.contains("<hr>"));
//! ```

pub mod assembler;
pub mod audit;
pub mod blocks;
pub mod classifier;
pub mod error;
pub mod markup;
pub mod normalizer;
pub mod template;

// Re-export commonly used types
pub use audit::{audit_layout, LayoutAudit};
pub use blocks::{extract_blocks, Block, Document, LooseFragment};
pub use classifier::{classify_blocks, ClassifiedBlock, Role};
pub use error::LayoutError;
pub use markup::{markup_to_plain_text, plain_text_to_markup, strip_code_fence};
pub use normalizer::{normalize, normalize_with_outcome, Normalization, Outcome};
pub use template::{compose_letter, format_letter_date};
