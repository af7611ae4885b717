//! Shared response envelope types for API handlers.
//!
//! All JSON API responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

use bigo_core::model::AnalysisResult;
use bigo_report::RenderedReport;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload of a completed analysis: the decoded backend result and the
/// rendered HTML for each report area.
#[derive(Debug, Serialize)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub report: RenderedReport,
}
