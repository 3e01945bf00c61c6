//! # Scriptorium - PDF Question Answering Server
//!
//! A retrieval-augmented server built in Rust that indexes PDF documents
//! and answers questions grounded in their content, backed by Azure OpenAI.
//!
//! ## Overview
//!
//! Scriptorium can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `scriptorium-server` binary
//! 2. **As a library** - Import components into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use scriptorium::db::InMemoryVectorStore;
//! use scriptorium::llm::AzureChatClient;
//! use scriptorium::rag::{AzureEmbedder, DocumentIndex};
//! use scriptorium::utils::toml_config::ScriptoriumConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScriptoriumConfig::load("scriptorium.toml")?;
//!
//!     let index = Arc::new(DocumentIndex::new(
//!         Arc::new(InMemoryVectorStore::new()),
//!         Arc::new(AzureEmbedder::from_config(&config.embedding)?),
//!         Arc::new(AzureChatClient::from_config(&config.chat)?),
//!     ));
//!
//!     let pdf = std::fs::read("report.pdf")?;
//!     index.ingest_pdf("report.pdf", &pdf, &config.rag).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command-line interface (init, config)
//! - [`db`] - Vector store and feedback persistence
//! - [`llm`] - Chat model client (Azure OpenAI)
//! - [`rag`] - PDF extraction, chunking, embedding, retrieval
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration with hot reload

#![cfg_attr(docsrs, feature(doc_cfg))]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// Vector store and feedback database.
pub mod db;
/// Chat model clients and abstractions.
pub mod llm;
/// Retrieval Augmented Generation (RAG) pipeline.
pub mod rag;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use db::{FeedbackStore, InMemoryVectorStore, VectorStore};
pub use llm::{AzureChatClient, ChatClient, ChatMessage};
pub use rag::{AzureEmbedder, DocumentIndex, Embedder};
pub use types::{AppError, Result};
pub use utils::toml_config::{ScriptoriumConfig, ScriptoriumConfigManager};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based configuration with hot-reload support
    pub config_manager: Arc<ScriptoriumConfigManager>,
    /// Document index (ingestion, retrieval, answering)
    pub index: Arc<DocumentIndex>,
    /// Feedback persistence
    pub feedback: Arc<FeedbackStore>,
}
