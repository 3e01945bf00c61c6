//! Chat client abstraction
//!
//! The QA pipeline talks to the chat model through the [`ChatClient`]
//! trait, allowing the Azure OpenAI implementation to be swapped for a
//! mock in tests or for another provider later.

use crate::types::Result;
use async_trait::async_trait;

/// Role of a chat message.
///
/// The QA pipeline only ever sends system and user messages; the
/// assistant side comes back as the completion text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

/// One message of a chat completion request.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Generic chat completion client.
///
/// Implementations send the message list to a chat model and return the
/// assistant's reply as plain text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a chat completion request and return the reply content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the deployment/model identifier this client talks to.
    fn deployment_name(&self) -> &str;
}
