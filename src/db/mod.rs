//! Storage layers.
//!
//! This module provides the two stores behind the server:
//! - **Vector store**: the chunk index queried during retrieval. The
//!   [`VectorStore`] trait is the seam for alternative backends; the
//!   shipped implementation is in-memory with an optional JSON snapshot.
//! - **Feedback store**: a local SQLite database (libsql) holding user
//!   feedback on answers.

// Vector index abstraction and in-memory implementation
pub mod vectorstore;

// Relational feedback database
pub mod feedback;

// Re-exports
pub use feedback::FeedbackStore;
pub use vectorstore::{InMemoryVectorStore, VectorStore};
