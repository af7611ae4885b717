pub mod analysis;
pub mod health;
pub mod pages;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /analysis                 current result, submit, reset
/// /analysis/export          download current result as JSON
/// /code/stats               editor statistics for posted code
/// /algorithms/{name}        backend algorithm catalogue lookup
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/analysis", analysis::router())
        .route("/code/stats", post(handlers::analysis::code_stats))
        .route("/algorithms/{name}", get(handlers::analysis::algorithm_info))
}
