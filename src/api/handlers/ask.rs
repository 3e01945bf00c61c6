//! Question answering handler.

use crate::types::{AskRequest, AskResponse, Result};
use crate::AppState;
use axum::{extract::State, Json};

/// Answer a question from the indexed documents.
///
/// Retrieves the most similar chunks, builds a grounded prompt and asks
/// the chat model. When the index is empty the handler short-circuits
/// with a fixed "no context" answer instead of calling the model.
#[utoipa::path(
    post,
    path = "/api/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Question answered", body = AskResponse),
        (status = 400, description = "Invalid question"),
        (status = 500, description = "Internal server error")
    ),
    tag = "ask"
)]
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let rag = state.config_manager.config().rag.clone();

    let response = state
        .index
        .answer(
            &request.question,
            request.language.unwrap_or_default(),
            request.top_k,
            &rag,
        )
        .await?;

    Ok(Json(response))
}
