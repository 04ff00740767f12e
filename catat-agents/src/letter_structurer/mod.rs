pub mod agent;
pub mod system_prompt;

pub use agent::{fallback_record, parse_structured_data, LetterStructurer, STRUCTURER_MODEL};
