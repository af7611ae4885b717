//! Server-rendered HTML pages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Root-level page routes (not under `/api/v1`).
///
/// ```text
/// GET  /          -> index
/// POST /analyze   -> analyze (form submit)
/// POST /clear     -> clear, redirects to /
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/analyze", post(pages::analyze))
        .route("/clear", post(pages::clear))
}
