//! User feedback handlers.
//!
//! Feedback rows are persisted in SQLite so answer quality can be
//! reviewed offline.

use crate::types::{AppError, FeedbackRecord, FeedbackRequest, Result};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::IntoParams;

const DEFAULT_LIST_LIMIT: usize = 100;

/// Record feedback about a question/answer pair.
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded"),
        (status = 400, description = "Invalid feedback"),
        (status = 500, description = "Internal server error")
    ),
    tag = "feedback"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<Value>> {
    if request.question.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Question must not be empty".to_string(),
        ));
    }
    if request.feedback.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Feedback must not be empty".to_string(),
        ));
    }

    let id = state
        .feedback
        .insert(&request.question, &request.response, &request.feedback)
        .await?;

    tracing::info!(id, "Feedback recorded");

    Ok(Json(json!({ "id": id, "status": "recorded" })))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FeedbackListParams {
    /// Maximum number of rows to return (default 100)
    pub limit: Option<usize>,
}

/// List recorded feedback, newest first.
#[utoipa::path(
    get,
    path = "/api/feedback",
    params(FeedbackListParams),
    responses(
        (status = 200, description = "Feedback listed", body = Vec<FeedbackRecord>),
        (status = 500, description = "Internal server error")
    ),
    tag = "feedback"
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(params): Query<FeedbackListParams>,
) -> Result<Json<Vec<FeedbackRecord>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let records = state.feedback.list(limit).await?;

    Ok(Json(records))
}
