pub mod language;
pub mod prompt;

pub use language::Language;
pub use prompt::{ChatMessage, ImageData, PromptPayload, Role};
