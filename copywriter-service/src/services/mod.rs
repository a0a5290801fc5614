pub mod gateway;
pub mod metrics;
pub mod prompt_builder;
pub mod providers;

pub use gateway::{Endpoint, InferenceGateway};
pub use prompt_builder::PromptBuilder;
