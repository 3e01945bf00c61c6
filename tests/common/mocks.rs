//! Mock implementations for testing.
//!
//! This module provides mock chat and embedding clients that can be used
//! across different test files without making actual API calls.

#![allow(dead_code)]

use async_trait::async_trait;
use scriptorium::llm::{ChatClient, ChatMessage};
use scriptorium::rag::Embedder;
use scriptorium::types::{AppError, Result};

/// Mock chat client with a configurable canned response.
///
/// # Examples
///
/// ```rust,ignore
/// let chat = MockChatClient::new("The answer is 42.");
/// let chat = MockChatClient::failing();
/// ```
#[derive(Clone)]
pub struct MockChatClient {
    response: String,
    should_fail: bool,
}

impl MockChatClient {
    /// Create a mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        if self.should_fail {
            return Err(AppError::Llm("Mock chat failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn deployment_name(&self) -> &str {
        "mock-chat"
    }
}

/// Deterministic mock embedder.
///
/// Embeds each text as a small fixed-size vector derived from its first
/// byte, so similar texts get similar vectors without any network calls.
#[derive(Clone, Default)]
pub struct MockEmbedder {
    should_fail: bool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    /// Create a mock embedder that always returns an error.
    pub fn failing() -> Self {
        Self { should_fail: true }
    }

    fn embed_one(text: &str) -> Vec<f32> {
        let first = text.bytes().next().unwrap_or(0) as f32;
        vec![1.0, first / 255.0, (text.len() % 17) as f32 / 17.0]
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.should_fail {
            return Err(AppError::Embedding("Mock embedding failure".to_string()));
        }
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }
}
