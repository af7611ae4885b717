//! Handlers for the JSON analysis API.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use bigo_core::error::CoreError;
use bigo_core::model::AnalysisResult;
use bigo_core::submission::{AnalysisRequest, CodeStats};
use bigo_report::render_report;

use crate::error::{AppError, AppResult};
use crate::response::{AnalysisOutcome, DataResponse};
use crate::state::AppState;

/// Body of `POST /api/v1/code/stats`.
#[derive(Debug, Deserialize)]
pub struct CodeBody {
    pub code: String,
}

/// GET /api/v1/analysis
///
/// The currently displayed result. 404 when the results area is hidden.
pub async fn current(State(state): State<AppState>) -> AppResult<Json<DataResponse<AnalysisResult>>> {
    let result = state
        .session
        .displayed()
        .await
        .ok_or_else(|| CoreError::NotFound("Analysis result".to_string()))?;

    Ok(Json(DataResponse {
        data: AnalysisResult::clone(&result),
    }))
}

/// POST /api/v1/analysis
///
/// Validate and submit code, store the result and return it together with
/// the rendered report areas. 409 while another analysis is in flight.
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> AppResult<Json<DataResponse<AnalysisOutcome>>> {
    let cancel = state.shutdown.child_token();
    let outcome = state
        .session
        .run(state.backend.as_ref(), &request, &cancel)
        .await;
    state.backend_status.observe(&outcome);
    let result = outcome?;

    let report = render_report(&result, state.diagrams.as_ref());
    Ok(Json(DataResponse {
        data: AnalysisOutcome {
            result: AnalysisResult::clone(&result),
            report,
        },
    }))
}

/// DELETE /api/v1/analysis
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.session.clear().await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/analysis/export
///
/// Download the stored result as a JSON attachment. A result hidden by a
/// later failed analysis is still exported.
pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let export = state.session.export().await?;
    tracing::info!(file_name = %export.file_name, "Exporting analysis result");

    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.json,
    ))
}

/// POST /api/v1/code/stats
pub async fn code_stats(Json(body): Json<CodeBody>) -> Json<DataResponse<CodeStats>> {
    Json(DataResponse {
        data: CodeStats::of(&body.code),
    })
}

/// GET /api/v1/algorithms/{name}
///
/// Proxy to the backend's algorithm catalogue.
pub async fn algorithm_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Algorithm name is required".to_string()));
    }

    let info = state
        .backend
        .algorithm_info(&name)
        .await
        .ok_or_else(|| CoreError::NotFound(format!("Algorithm '{name}'")))?;

    Ok(Json(DataResponse { data: info }))
}
