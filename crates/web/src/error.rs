use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use bigo_client::api::AnalyzerApiError;
use bigo_client::session::SessionError;
use bigo_core::error::CoreError;

const BUSY_MESSAGE: &str = "Ya hay un análisis en progreso";
const NOTHING_TO_EXPORT_MESSAGE: &str = "No hay resultados para exportar";
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`SessionError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status, machine-readable code and user-facing message.
    ///
    /// Internal failures are logged here and replaced by a sanitized message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => classify_core(core),
            AppError::Session(session) => match session {
                SessionError::Invalid(core) => classify_core(core),
                SessionError::Busy => (StatusCode::CONFLICT, "CONFLICT", BUSY_MESSAGE.to_string()),
                SessionError::NothingToExport => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    NOTHING_TO_EXPORT_MESSAGE.to_string(),
                ),
                SessionError::Backend(backend) => classify_backend(backend),
                SessionError::Serialize(err) => internal(err),
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound(what) => (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{what} not found")),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

/// Timeouts get their own status so callers can tell a slow analysis from a
/// broken backend.
fn classify_backend(err: &AnalyzerApiError) -> (StatusCode, &'static str, String) {
    tracing::warn!(error = %err, "Backend call failed");
    match err {
        AnalyzerApiError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "BACKEND_TIMEOUT",
            err.user_message(),
        ),
        _ => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", err.user_message()),
    }
}

fn internal(err: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}
