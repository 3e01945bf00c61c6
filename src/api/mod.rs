//! HTTP API layer.
//!
//! Endpoints (nested under `/api` by the binary):
//! - `POST /api/documents` - upload PDFs (multipart)
//! - `GET /api/documents` - list ingested documents
//! - `DELETE /api/documents/{name}` - remove a document
//! - `GET /api/store` - vector store info
//! - `GET /api/search` - similarity search
//! - `POST /api/ask` - grounded question answering
//! - `POST /api/feedback` / `GET /api/feedback` - answer feedback
//!
//! `GET /health` lives at the root.

pub mod handlers;
pub mod routes;

pub use routes::create_router;
