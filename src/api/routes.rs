use crate::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

/// Build the API router.
///
/// The returned router is nested under `/api` by the binary; the
/// health probe is mounted at the root separately.
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Document management
        .route(
            "/documents",
            post(handlers::documents::upload).get(handlers::documents::list_documents),
        )
        .route(
            "/documents/{name}",
            delete(handlers::documents::delete_document),
        )
        .route("/store", get(handlers::documents::store_info))
        .route("/search", get(handlers::documents::search))
        // Question answering
        .route("/ask", post(handlers::ask::ask))
        // Feedback
        .route(
            "/feedback",
            post(handlers::feedback::submit_feedback).get(handlers::feedback::list_feedback),
        )
}
