//! Prompt construction for both endpoints.
//!
//! The instruction text is fixed per endpoint and adapted in two ways: the
//! image prompt is reworded around caller-supplied criteria, and any
//! non-English language gets a trailing "Please respond in X." sentence.
//! The configured [`PromptFormat`] decides whether that text travels as a flat
//! prompt or as the user turn of a short scripted conversation.

use crate::config::PromptFormat;
use crate::models::{ChatMessage, ImageData, Language, PromptPayload, Role};

pub const IMAGE_DESCRIPTION_INSTRUCTION: &str =
    "Generate a single-paragraph product description based on the provided image.";

pub const CRITERIA_INSTRUCTION_PREFIX: &str =
    "Focus the description on the following criteria:";

pub const SOCIAL_POSTS_INSTRUCTION: &str =
    "Take the description and generate 3 instagram posts based on it. Here is the description:";

pub const MARKETING_SYSTEM_PROMPT: &str = "You are a marketing assistant for an online store. \
     You write accurate, persuasive copy for product listings and social media. \
     Only describe what is visible or stated; never invent specifications, prices, or claims.";

pub const MARKETING_ASSISTANT_ACK: &str =
    "Understood. Share the product details and I will write the copy.";

#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    format: PromptFormat,
}

impl PromptBuilder {
    pub fn new(format: PromptFormat) -> Self {
        Self { format }
    }

    /// The payload shape this builder produces.
    pub fn format(&self) -> PromptFormat {
        self.format
    }

    /// Build the `/image-description` payload.
    ///
    /// Blank criteria are treated as absent.
    pub fn description_prompt(
        &self,
        image: ImageData,
        language: Language,
        criteria: Option<&str>,
    ) -> PromptPayload {
        let instruction = match applied_criteria(criteria) {
            Some(criteria) => format!(
                "{} {} {}",
                IMAGE_DESCRIPTION_INSTRUCTION, CRITERIA_INSTRUCTION_PREFIX, criteria
            ),
            None => IMAGE_DESCRIPTION_INSTRUCTION.to_string(),
        };

        self.assemble(localize(instruction, language), Some(image))
    }

    /// Build the `/social-posts` payload. The description is embedded verbatim.
    pub fn social_post_prompt(&self, description: &str, language: Language) -> PromptPayload {
        let instruction = format!("{} {}", SOCIAL_POSTS_INSTRUCTION, description);
        self.assemble(localize(instruction, language), None)
    }

    fn assemble(&self, instruction: String, image: Option<ImageData>) -> PromptPayload {
        match self.format {
            PromptFormat::Flat => PromptPayload::Flat {
                prompt: instruction,
                image,
            },
            PromptFormat::Conversation => PromptPayload::Conversation {
                messages: vec![
                    ChatMessage::new(Role::System, MARKETING_SYSTEM_PROMPT),
                    ChatMessage::new(Role::Assistant, MARKETING_ASSISTANT_ACK),
                    ChatMessage::new(Role::User, instruction),
                ],
                image,
            },
        }
    }
}

/// Criteria that will reach the prompt. Blank text counts as absent; anything
/// else is used exactly as supplied.
pub fn applied_criteria(criteria: Option<&str>) -> Option<&str> {
    criteria.filter(|c| !c.trim().is_empty())
}

fn localize(instruction: String, language: Language) -> String {
    match language.response_instruction() {
        Some(suffix) => format!("{} {}", instruction, suffix),
        None => instruction,
    }
}
