use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= RAG Types =============

/// A single piece of a document stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub document_name: String,
    pub insert_date: DateTime<Utc>,
    pub kind: ChunkKind,
}

/// Distinguishes ordinary body text from the synthesized metadata
/// summary appended at ingest time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Body,
    Metadata,
}

/// A chunk paired with its similarity score from a search.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Language the answer should be written in.
///
/// Each variant carries a fixed instruction sentence appended to the
/// QA system prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLanguage {
    #[default]
    French,
    English,
    Spanish,
    German,
}

impl AnswerLanguage {
    pub fn instruction(&self) -> &'static str {
        match self {
            AnswerLanguage::French => "Réponds en français.",
            AnswerLanguage::English => "Answer in English.",
            AnswerLanguage::Spanish => "Responde en español.",
            AnswerLanguage::German => "Antwort auf Deutsch.",
        }
    }
}

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<AnswerLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    pub language: AnswerLanguage,
    pub top_k: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Source {
    pub document_name: String,
    pub score: f32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResult {
    pub document_name: String,
    pub chunks_indexed: usize,
    pub metadata_synthesized: bool,
}

/// Per-file outcome of a multipart upload (`POST /api/documents`).
///
/// Files are ingested independently; a failure on one file is recorded
/// in its entry and does not affect the others.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub document_name: String,
    pub chunks_indexed: usize,
    pub metadata_synthesized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn indexed(result: IngestResult) -> Self {
        Self {
            document_name: result.document_name,
            chunks_indexed: result.chunks_indexed,
            metadata_synthesized: result.metadata_synthesized,
            error: None,
        }
    }

    pub fn failed(document_name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            document_name: document_name.into(),
            chunks_indexed: 0,
            metadata_synthesized: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub document_name: String,
    pub chunks_removed: usize,
}

/// One row of the document listing (`GET /api/documents`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentRow {
    pub document_name: String,
    pub chunks: usize,
    pub insert_date: DateTime<Utc>,
}

/// Summary of the vector store (`GET /api/store`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreInfo {
    pub backend: String,
    pub documents: usize,
    pub chunks: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    pub document_name: String,
    pub content: String,
    pub kind: ChunkKind,
    pub score: f32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub question: String,
    pub response: String,
    pub feedback: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackRecord {
    pub id: i64,
    pub question: String,
    pub response: String,
    pub feedback: String,
    pub timestamp: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Database(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Llm(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Embedding(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Pdf(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            AppError::Configuration(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
