//! Retrieval Augmented Generation (RAG) Pipeline
//!
//! This module provides the core pipeline turning uploaded PDFs into an
//! index that grounds the chat model's answers.
//!
//! # Module Structure
//!
//! - [`rag::pdf`](crate::rag::pdf) - PDF text extraction (per page)
//! - [`rag::chunker`](crate::rag::chunker) - Character chunking with overlap
//! - [`rag::embeddings`](crate::rag::embeddings) - Embedding service (Azure OpenAI)
//! - [`rag::index`](crate::rag::index) - Ingestion/retrieval/answering orchestrator
//!
//! # Pipeline
//!
//! 1. **Extraction** - PDF pages are converted to text
//! 2. **Chunking** - Text is split into overlapping chunks
//! 3. **Metadata** - Optionally, the chat model summarizes the document
//!    (title, author, themes, ...) and the summary is indexed as an
//!    extra chunk
//! 4. **Embedding** - Chunk texts are embedded in one batch
//! 5. **Retrieval** - Questions are embedded and matched by cosine
//!    similarity
//! 6. **Generation** - The chat model answers from the retrieved context

pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod pdf;

pub use embeddings::{AzureEmbedder, Embedder};
pub use index::{DocumentIndex, NO_CONTEXT_ANSWER};
