//! Route definitions for the `/analysis` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// Routes mounted at `/analysis`.
///
/// ```text
/// GET    /         -> current
/// POST   /         -> submit
/// DELETE /         -> clear
/// GET    /export   -> export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(analysis::current)
                .post(analysis::submit)
                .delete(analysis::clear),
        )
        .route("/export", get(analysis::export))
}
