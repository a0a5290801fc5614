//! Payloads handed to the inference backend.

use serde::{Deserialize, Serialize};

/// Image data as supplied by the client. Never decoded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageData {
    /// `[137, 80, 78, 71, ...]`
    Bytes(Vec<u8>),
    /// Base64 (or other) encoded string.
    Encoded(String),
}

impl ImageData {
    pub fn is_empty(&self) -> bool {
        match self {
            ImageData::Bytes(bytes) => bytes.is_empty(),
            ImageData::Encoded(encoded) => encoded.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The exact model input. Serializes to the backend's JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PromptPayload {
    Flat {
        prompt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<ImageData>,
    },
    Conversation {
        messages: Vec<ChatMessage>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<ImageData>,
    },
}

impl PromptPayload {
    /// The instruction text the model acts on: the flat prompt, or the last
    /// user turn of a conversation.
    pub fn instruction(&self) -> &str {
        match self {
            PromptPayload::Flat { prompt, .. } => prompt,
            PromptPayload::Conversation { messages, .. } => messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.as_str())
                .unwrap_or_default(),
        }
    }

    pub fn image(&self) -> Option<&ImageData> {
        match self {
            PromptPayload::Flat { image, .. } | PromptPayload::Conversation { image, .. } => {
                image.as_ref()
            }
        }
    }
}
