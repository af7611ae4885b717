//! Single-slot analysis session.
//!
//! [`AnalysisSession`] owns the currently displayed result. Only one
//! analysis may be in flight at a time; a second submission is rejected
//! immediately instead of being queued. Starting an analysis hides the
//! results area, a successful one replaces the stored result and shows it,
//! and a failed one leaves the stored result untouched but hidden.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use bigo_core::error::CoreError;
use bigo_core::model::AnalysisResult;
use bigo_core::submission::AnalysisRequest;

use crate::api::AnalyzerApiError;
use crate::backend::AnalysisBackend;

/// Errors surfaced by [`AnalysisSession`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The submission failed local validation; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Another analysis is still in flight.
    #[error("An analysis is already in progress")]
    Busy,

    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] AnalyzerApiError),

    /// There is no stored result to export.
    #[error("No results to export")]
    NothingToExport,

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A stored result rendered as a downloadable JSON document.
#[derive(Debug, Clone)]
pub struct Export {
    /// Suggested download name, `analisis_<unix-millis>.json`.
    pub file_name: String,
    pub json: String,
}

#[derive(Debug, Default)]
struct DisplayState {
    current: Option<Arc<AnalysisResult>>,
    visible: bool,
}

/// Owner of the currently displayed analysis result.
///
/// Created once at startup and shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    in_flight: AtomicBool,
    state: RwLock<DisplayState>,
}

/// Holds the in-flight slot; releases it when dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an analysis is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate, submit and store one analysis.
    ///
    /// Validation runs before the in-flight check, matching the order in
    /// which the form reports problems to the user.
    pub async fn run(
        &self,
        backend: &dyn AnalysisBackend,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<Arc<AnalysisResult>, SessionError> {
        request.validate()?;

        let _guard = self.begin()?;
        self.state.write().await.visible = false;

        match backend.analyze(request, cancel).await {
            Ok(result) => {
                let result = Arc::new(result);
                let mut state = self.state.write().await;
                state.current = Some(Arc::clone(&result));
                state.visible = true;
                tracing::info!("Analysis stored as current result");
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analysis failed; results hidden");
                Err(SessionError::Backend(e))
            }
        }
    }

    /// The result currently shown to the user, if the results area is visible.
    pub async fn displayed(&self) -> Option<Arc<AnalysisResult>> {
        let state = self.state.read().await;
        state.visible.then(|| state.current.clone()).flatten()
    }

    /// Explicit reset: drop the stored result and hide the results area.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.current = None;
        state.visible = false;
        tracing::info!("Analysis session cleared");
    }

    /// Serialize the stored result for download.
    ///
    /// A result hidden by a later failed analysis is still exportable.
    pub async fn export(&self) -> Result<Export, SessionError> {
        let current = self
            .state
            .read()
            .await
            .current
            .clone()
            .ok_or(SessionError::NothingToExport)?;

        Ok(Export {
            file_name: format!("analisis_{}.json", Utc::now().timestamp_millis()),
            json: serde_json::to_string_pretty(current.as_ref())?,
        })
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, SessionError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::warn!("Rejected analysis: another one is in progress");
                SessionError::Busy
            })?;
        Ok(InFlightGuard(&self.in_flight))
    }
}
