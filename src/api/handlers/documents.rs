//! Document management handlers.
//!
//! Provides endpoints for:
//! - PDF upload and ingestion (multipart)
//! - Document deletion
//! - Listing documents and inspecting the vector store

use crate::types::{
    AppError, DeleteResponse, DocumentRow, Result, SearchHit, StoreInfo, UploadResult,
};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Default row limit for document listing, matching the knowledge base view.
const DEFAULT_LIST_LIMIT: usize = 100;

// ============================================================================
// Upload Endpoint
// ============================================================================

/// Upload one or more PDF files and index their content.
///
/// Each file in the multipart body is ingested independently; a file
/// that fails (not a PDF, unreadable, nothing extracted) is reported in
/// its own result entry and does not abort the rest of the batch.
/// Re-uploading an existing document name replaces its previous chunks.
#[utoipa::path(
    post,
    path = "/api/documents",
    responses(
        (status = 200, description = "Per-file ingestion results", body = Vec<UploadResult>),
        (status = 400, description = "Invalid upload"),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<UploadResult>>> {
    let rag = state.config_manager.config().rag.clone();

    let mut results = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        // Skip non-file fields
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        if !file_name.to_lowercase().ends_with(".pdf") {
            results.push(UploadResult::failed(
                &file_name,
                format!("'{}' is not a PDF file", file_name),
            ));
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;

        match state.index.ingest_pdf(&file_name, &bytes, &rag).await {
            Ok(result) => results.push(UploadResult::indexed(result)),
            Err(e) => {
                tracing::warn!(document = %file_name, error = %e, "Failed to ingest upload");
                results.push(UploadResult::failed(&file_name, e));
            }
        }
    }

    if results.is_empty() {
        return Err(AppError::InvalidInput(
            "No PDF file found in the request".to_string(),
        ));
    }

    Ok(Json(results))
}

// ============================================================================
// Delete Endpoint
// ============================================================================

/// Delete all indexed chunks of a document.
///
/// Unknown names are not an error; they report zero removed chunks.
#[utoipa::path(
    delete,
    path = "/api/documents/{name}",
    params(("name" = String, Path, description = "Document name as uploaded")),
    responses(
        (status = 200, description = "Document removed", body = DeleteResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let chunks_removed = state.index.delete_document(&name).await?;

    Ok(Json(DeleteResponse {
        document_name: name,
        chunks_removed,
    }))
}

// ============================================================================
// Listing / Inspection Endpoints
// ============================================================================

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    /// Maximum number of rows to return (default 100)
    pub limit: Option<usize>,
}

/// List ingested documents with chunk counts and insert dates.
#[utoipa::path(
    get,
    path = "/api/documents",
    params(ListParams),
    responses(
        (status = 200, description = "Documents listed", body = Vec<DocumentRow>),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DocumentRow>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(state.index.list_documents(limit)))
}

/// High-level info about the vector store.
#[utoipa::path(
    get,
    path = "/api/store",
    responses(
        (status = 200, description = "Store info", body = StoreInfo),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
pub async fn store_info(State(state): State<AppState>) -> Result<Json<StoreInfo>> {
    Ok(Json(state.index.store_info()))
}

// ============================================================================
// Search Endpoint
// ============================================================================

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Query text
    pub q: String,
    /// Number of results (clamped to the configured maximum)
    pub k: Option<usize>,
}

/// Read-only similarity search over the index.
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Search completed", body = Vec<SearchHit>),
        (status = 400, description = "Invalid query"),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput("Query must not be empty".to_string()));
    }

    let rag = state.config_manager.config().rag.clone();
    let top_k = crate::rag::index::clamp_top_k(params.k, &rag);

    let hits = state.index.retrieve(&params.q, top_k).await?;

    let results = hits
        .into_iter()
        .map(|h| SearchHit {
            document_name: h.chunk.metadata.document_name,
            content: h.chunk.content,
            kind: h.chunk.metadata.kind,
            score: h.score,
        })
        .collect();

    Ok(Json(results))
}
