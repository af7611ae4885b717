//! Server-rendered page handlers.
//!
//! The form posts back to the server and the whole page is re-rendered with
//! the outcome, so the page works without client-side scripting apart from
//! the diagram renderer.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

use bigo_client::session::SessionError;
use bigo_core::submission::AnalysisRequest;
use bigo_report::{render_page, render_report, Notice, PageContext};

use crate::error::AppError;
use crate::state::AppState;

const SUCCESS_MESSAGE: &str = "Análisis completado exitosamente";
const BACKEND_ERROR_PREFIX: &str = "Error en el análisis: ";

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let report = state
        .session
        .displayed()
        .await
        .map(|result| render_report(&result, state.diagrams.as_ref()));

    Html(render_page(&PageContext {
        report: report.as_ref(),
        backend_healthy: state.backend_status.is_online(),
        ..PageContext::default()
    }))
}

/// POST /analyze
///
/// Failures re-render the page with the submitted code kept in the editor
/// and the results area hidden. The backend is called once; the status
/// badge comes from the cached [`BackendStatus`](crate::state::BackendStatus).
pub async fn analyze(
    State(state): State<AppState>,
    Form(request): Form<AnalysisRequest>,
) -> Response {
    let cancel = state.shutdown.child_token();
    let outcome = state
        .session
        .run(state.backend.as_ref(), &request, &cancel)
        .await;
    state.backend_status.observe(&outcome);

    let (status, report, notice) = match outcome {
        Ok(result) => (
            StatusCode::OK,
            Some(render_report(&result, state.diagrams.as_ref())),
            Notice::success(SUCCESS_MESSAGE),
        ),
        Err(err) => {
            let (status, message) = failure_notice(err);
            (status, None, Notice::error(message))
        }
    };

    let page = render_page(&PageContext {
        code: &request.code,
        code_type: request.code_type,
        algorithm_name: &request.algorithm_name,
        report: report.as_ref(),
        notice: Some(notice),
        backend_healthy: state.backend_status.is_online(),
    });
    (status, Html(page)).into_response()
}

/// POST /clear
pub async fn clear(State(state): State<AppState>) -> Redirect {
    state.session.clear().await;
    Redirect::to("/")
}

fn failure_notice(err: SessionError) -> (StatusCode, String) {
    let is_backend = matches!(err, SessionError::Backend(_));
    let (status, _, message) = AppError::from(err).classify();
    if is_backend {
        (status, format!("{BACKEND_ERROR_PREFIX}{message}"))
    } else {
        (status, message)
    }
}
