//! Chat Model Clients
//!
//! This module provides the interface to the chat model used for answer
//! generation and document metadata synthesis.
//!
//! # Architecture
//!
//! - [`ChatClient`] - The core trait the rest of the application depends on
//! - [`AzureChatClient`] - Azure OpenAI implementation (async-openai)
//!
//! Tests substitute a hand-written mock for [`ChatClient`].

/// Core chat client trait and message types.
pub mod client;

/// Azure OpenAI chat implementation.
pub mod azure;

pub use azure::AzureChatClient;
pub use client::{ChatClient, ChatMessage, ChatRole};
