//! REST client for the complexity analysis backend.
//!
//! Wraps the backend HTTP API (analysis submission, health banner,
//! algorithm catalogue) using [`reqwest`]. Every call is bounded by the
//! client's deadline; the analysis call can additionally be cancelled
//! through a [`CancellationToken`].

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use bigo_core::health::is_healthy_banner;
use bigo_core::model::AnalysisResult;
use bigo_core::submission::AnalysisRequest;

/// Default deadline for a single backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ANALYZE_PATH: &str = "analyze";
const ALGORITHM_PATH: &str = "algorithm";
const JSON: &str = "application/json";

/// HTTP client for one analysis backend.
pub struct AnalyzerApi {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

/// Body of `GET /` on a running backend.
#[derive(Debug, Deserialize)]
struct HealthBanner {
    #[serde(default)]
    message: Option<String>,
}

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerApiError {
    /// The request never produced a response (DNS, refused connection, TLS).
    #[error("Backend unreachable: {0}")]
    Connection(#[source] reqwest::Error),

    /// The deadline elapsed before the backend answered.
    #[error("Backend did not answer within {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-2xx status code.
    #[error("Backend returned HTTP {status}: {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The 2xx body was not the expected JSON document.
    #[error("Backend response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,
}

impl AnalyzerApiError {
    /// Message shown to the user in the failure notification.
    pub fn user_message(&self) -> String {
        match self {
            AnalyzerApiError::Connection(_) => {
                "No se pudo conectar con el backend. Verifica que esté ejecutándose.".to_string()
            }
            AnalyzerApiError::Timeout(_) => {
                "La solicitud tardó demasiado. El algoritmo puede ser muy complejo.".to_string()
            }
            AnalyzerApiError::Status {
                status,
                status_text,
            } => format!("HTTP {status}: {status_text}"),
            AnalyzerApiError::Decode(_) => {
                "El backend devolvió una respuesta no válida.".to_string()
            }
            AnalyzerApiError::Cancelled => "La solicitud fue cancelada.".to_string(),
        }
    }

    fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AnalyzerApiError::Timeout(timeout)
        } else {
            AnalyzerApiError::Connection(err)
        }
    }
}

impl AnalyzerApi {
    /// Create a new API client.
    ///
    /// * `base_url` - backend root, e.g. `http://localhost:8000/`.
    /// * `timeout`  - deadline applied to every call.
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, timeout)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Submit source code for analysis.
    ///
    /// Sends `POST /analyze` and decodes the report. The request is raced
    /// against the deadline and `cancel`; whichever loses is dropped, which
    /// aborts the in-flight HTTP exchange.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalyzerApiError> {
        let url = self.endpoint(&[ANALYZE_PATH]);
        tracing::debug!(
            url = %url,
            code_type = request.code_type.as_str(),
            code_len = request.code.len(),
            "Sending analysis request",
        );

        let call = async {
            let response = self
                .client
                .post(url)
                .header(ACCEPT, JSON)
                .json(request)
                .send()
                .await
                .map_err(|e| AnalyzerApiError::from_send(e, self.timeout))?;

            let response = Self::ensure_success(response).await?;
            response
                .json::<AnalysisResult>()
                .await
                .map_err(AnalyzerApiError::Decode)
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AnalyzerApiError::Cancelled),
            result = tokio::time::timeout(self.timeout, call) => {
                result.unwrap_or(Err(AnalyzerApiError::Timeout(self.timeout)))
            }
        };

        match &outcome {
            Ok(result) => tracing::info!(
                lines = result.lines().len(),
                has_validation = result.validation.is_some(),
                "Analysis response received",
            ),
            Err(e) => tracing::warn!(error = %e, "Analysis request failed"),
        }

        outcome
    }

    /// Check whether the backend is up and announcing itself correctly.
    ///
    /// Any failure shape (transport error, non-2xx, non-JSON body, missing
    /// or unexpected banner) counts as unhealthy.
    pub async fn check_health(&self) -> bool {
        match tokio::time::timeout(self.timeout, self.fetch_banner()).await {
            Ok(Ok(banner)) => {
                let healthy = is_healthy_banner(&banner);
                if !healthy {
                    tracing::warn!(banner = %banner, "Backend answered with an unexpected banner");
                }
                healthy
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %self.base_url, error = %e, "Backend health check failed");
                false
            }
            Err(_) => {
                tracing::warn!(url = %self.base_url, "Backend health check timed out");
                false
            }
        }
    }

    /// Fetch descriptive information about a named algorithm.
    ///
    /// Sends `GET /algorithm/{name}`. Any failure yields `None`.
    pub async fn algorithm_info(&self, name: &str) -> Option<serde_json::Value> {
        let url = self.endpoint(&[ALGORITHM_PATH, name]);

        let call = async {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, JSON)
                .send()
                .await
                .map_err(|e| AnalyzerApiError::from_send(e, self.timeout))?;
            let response = Self::ensure_success(response).await?;
            response
                .json::<serde_json::Value>()
                .await
                .map_err(AnalyzerApiError::Decode)
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(info)) => Some(info),
            Ok(Err(e)) => {
                tracing::warn!(algorithm = %name, error = %e, "Algorithm lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!(algorithm = %name, "Algorithm lookup timed out");
                None
            }
        }
    }

    // ---- private helpers ----

    async fn fetch_banner(&self) -> Result<String, AnalyzerApiError> {
        let response = self
            .client
            .get(self.endpoint(&[]))
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(|e| AnalyzerApiError::from_send(e, self.timeout))?;

        let response = Self::ensure_success(response).await?;
        let banner = response
            .json::<HealthBanner>()
            .await
            .map_err(AnalyzerApiError::Decode)?;

        Ok(banner.message.unwrap_or_default())
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or [`AnalyzerApiError::Status`] on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AnalyzerApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::error!(status = status.as_u16(), body = %body, "Backend returned an error");

        Err(AnalyzerApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}
