pub mod error;
pub mod letter_structurer;
pub mod letter_writer;
pub mod llm;
pub mod pipeline;
pub mod transcriber;

pub use error::CollaboratorError;
pub use letter_structurer::LetterStructurer;
pub use letter_writer::LetterWriter;
pub use llm::{ClaudeClient, CompletionRequest, CompletionResponse, GroqClient, LlmClient};
pub use pipeline::{finalize_letter, GeneratedLetter, LetterPipeline};
pub use transcriber::{AudioClip, Transcriber, WhisperTranscriber};
