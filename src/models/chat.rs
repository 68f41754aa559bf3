use serde::{Deserialize, Serialize};

use crate::models::entity::Materialize;

/// Role of a chat message author. Unknown roles from the server are a hard
/// materialization error, not silently mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    Assistant,
    User,
}

/// Message from an LLM, with role & content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// Chat message with free-form metadata, used for demonstration outputs on
/// test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageWithMetadata {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Materialize for ChatMessage {
    const WIRE_NAME: &'static str = "chat message";
}

impl Materialize for ChatMessageWithMetadata {
    const WIRE_NAME: &'static str = "chat message";
}
