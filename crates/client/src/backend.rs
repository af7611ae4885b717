//! Abstraction over the analysis backend.
//!
//! The web layer and [`AnalysisSession`](crate::session::AnalysisSession)
//! talk to this trait so tests can substitute an in-memory backend.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bigo_core::model::AnalysisResult;
use bigo_core::submission::AnalysisRequest;

use crate::api::{AnalyzerApi, AnalyzerApiError};

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Run one analysis. See [`AnalyzerApi::analyze`].
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalyzerApiError>;

    /// `true` only when the backend announces itself as active.
    async fn check_health(&self) -> bool;

    /// Descriptive information about a named algorithm, if available.
    async fn algorithm_info(&self, name: &str) -> Option<serde_json::Value>;
}

#[async_trait]
impl AnalysisBackend for AnalyzerApi {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalyzerApiError> {
        AnalyzerApi::analyze(self, request, cancel).await
    }

    async fn check_health(&self) -> bool {
        AnalyzerApi::check_health(self).await
    }

    async fn algorithm_info(&self, name: &str) -> Option<serde_json::Value> {
        AnalyzerApi::algorithm_info(self, name).await
    }
}
