use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use bigo_client::api::AnalyzerApiError;
use bigo_client::backend::AnalysisBackend;
use bigo_client::session::{AnalysisSession, SessionError};
use bigo_report::{DiagramEngine, MermaidEngine};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc` or is a token handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Analysis backend (the HTTP adapter in production).
    pub backend: Arc<dyn AnalysisBackend>,
    /// Last known backend reachability, shown in the page header.
    pub backend_status: Arc<BackendStatus>,
    /// The single currently displayed result.
    pub session: Arc<AnalysisSession>,
    pub diagrams: Arc<dyn DiagramEngine>,
    /// Cancelled on shutdown; in-flight analyses are aborted with it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: ServerConfig, backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            backend_status: Arc::new(BackendStatus::default()),
            session: Arc::new(AnalysisSession::new()),
            diagrams: Arc::new(MermaidEngine),
            shutdown: CancellationToken::new(),
        }
    }

    /// Ask the backend for its health and record the answer.
    pub async fn refresh_backend_status(&self) -> bool {
        let online = self.backend.check_health().await;
        self.backend_status.record(online);
        online
    }
}

/// Cached backend health.
///
/// Request handlers read this instead of calling the backend, so a hung backend costs a
/// page at most one analyzer deadline.
#[derive(Debug, Default)]
pub struct BackendStatus {
    online: AtomicBool,
}

impl BackendStatus {
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn record(&self, online: bool) {
        let was = self.online.swap(online, Ordering::AcqRel);
        if was != online {
            tracing::info!(online, "Backend status changed");
        }
    }

    /// Update from the outcome of an analysis. Only answers that say
    /// something about reachability change the status.
    pub fn observe<T>(&self, outcome: &Result<T, SessionError>) {
        match outcome {
            Ok(_) => self.record(true),
            Err(SessionError::Backend(AnalyzerApiError::Connection(_))) => self.record(false),
            Err(_) => {}
        }
    }
}
