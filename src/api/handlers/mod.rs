//! HTTP request handlers.
//!
//! Handlers are grouped by concern:
//! - [`documents`] - upload, delete, list, store inspection, search
//! - [`ask`] - retrieval-grounded question answering
//! - [`feedback`] - answer feedback persistence
//! - [`health`] - liveness probe

pub mod ask;
pub mod documents;
pub mod feedback;
pub mod health;
