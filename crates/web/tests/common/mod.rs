#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::routing;
use axum::Router;
use http_body_util::BodyExt;
use reqwest::Url;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use bigo_client::api::{AnalyzerApi, AnalyzerApiError};
use bigo_client::backend::AnalysisBackend;
use bigo_core::model::AnalysisResult;
use bigo_core::submission::AnalysisRequest;
use bigo_web::config::ServerConfig;
use bigo_web::router::build_app_router;
use bigo_web::state::AppState;

/// Source that passes submission validation.
pub const VALID_CODE: &str = "for i in range(n):\n    total += i";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default)
/// and the production deadlines (60-second request, 30-second backend).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 60,
        analyzer_base_url: Url::parse("http://localhost:8000").unwrap(),
        analyzer_timeout_secs: 30,
    }
}

// ---------------------------------------------------------------------------
// Scripted backend
// ---------------------------------------------------------------------------

type Outcome = Box<dyn Fn() -> Result<AnalysisResult, AnalyzerApiError> + Send + Sync>;

/// In-memory [`AnalysisBackend`] whose answers are fixed by the test.
pub struct FakeBackend {
    outcome: Mutex<Outcome>,
    healthy: AtomicBool,
    health_checks: AtomicUsize,
    algorithms: HashMap<String, Value>,
    calls: AtomicUsize,
    last_request: Mutex<Option<AnalysisRequest>>,
}

impl FakeBackend {
    /// Healthy backend answering every analysis with `result`.
    pub fn returning(result: Value) -> Arc<Self> {
        let result: AnalysisResult = serde_json::from_value(result).unwrap();
        Self::with_outcome(Box::new(move || Ok(result.clone())))
    }

    /// Healthy backend failing every analysis with the error built by `make`.
    pub fn failing(make: fn() -> AnalyzerApiError) -> Arc<Self> {
        Self::with_outcome(Box::new(move || Err(make())))
    }

    fn with_outcome(outcome: Outcome) -> Arc<Self> {
        let mut algorithms = HashMap::new();
        algorithms.insert(
            "merge_sort".to_string(),
            serde_json::json!({ "name": "merge_sort", "complexity": "O(n log n)" }),
        );

        Arc::new(Self {
            outcome: Mutex::new(outcome),
            healthy: AtomicBool::new(true),
            health_checks: AtomicUsize::new(0),
            algorithms,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Replace the scripted answer for subsequent analyses.
    pub fn set_failing(&self, make: fn() -> AnalyzerApiError) {
        *self.outcome.lock().unwrap() = Box::new(move || Err(make()));
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Number of `check_health` calls received so far.
    pub fn health_checks(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<AnalysisRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for FakeBackend {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        _cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalyzerApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let outcome = self.outcome.lock().unwrap();
        outcome()
    }

    async fn check_health(&self) -> bool {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        self.is_healthy()
    }

    async fn algorithm_info(&self, name: &str) -> Option<Value> {
        self.algorithms.get(name).cloned()
    }
}

/// A representative backend payload touching every report area.
pub fn sample_result() -> Value {
    serde_json::json!({
        "complexity": {
            "big_o": "O(n)",
            "omega": "Ω(n)",
            "theta": "Θ(n)",
            "explanation": "Un solo recorrido"
        },
        "line_analysis": [
            { "line": 1, "raw": "for i in range(n):", "type": "for_loop",
              "exec_count": "n+1", "time_cost": "c1(n+1)" },
            { "line": 2, "raw": "total += i", "type": "assignment",
              "exec_count": "n", "time_cost": "c2*n" }
        ],
        "recurrence": { "equation": "T(n) = T(n-1) + c", "simplified": "O(n)" },
        "validation": {
            "overall_score": 92,
            "mathematical_rigor": "HIGH",
            "auto_analysis": { "complexity": { "big_o": "O(n)" } },
            "complexity_details": { "gemini_complexities": { "big_o": "O(n)" } }
        },
        "patterns": [
            { "name": "Recorrido lineal", "confidence": "alta", "description": "Un bucle simple" }
        ],
        "mermaid_code": "flowchart TD\n  A --> B"
    })
}

/// Build the full application router with all middleware layers around the
/// given backend.
///
/// The cached backend status is seeded from the fake, as the startup health check
/// would do in `main.rs`.
pub fn build_test_app(backend: Arc<FakeBackend>) -> Router {
    build_test_app_with_state(backend).0
}

/// Like [`build_test_app`], also returning the state so tests can drive the
/// shared session directly.
pub fn build_test_app_with_state(backend: Arc<FakeBackend>) -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(config.clone(), backend.clone());
    state.backend_status.record(backend.is_healthy());
    (build_app_router(state.clone(), &config), state)
}

// ---------------------------------------------------------------------------
// Real adapter against a stub backend
// ---------------------------------------------------------------------------

/// Bind a backend that accepts connections but never answers `GET /` or
/// `POST /analyze`.
pub async fn spawn_hanging_backend() -> Url {
    async fn hang() -> &'static str {
        std::future::pending::<()>().await;
        "unreachable"
    }

    let router = Router::new()
        .route("/", routing::get(hang))
        .route("/analyze", routing::post(hang));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// Build the application around the real [`AnalyzerApi`] with the given
/// backend deadline and whole-request deadline.
pub fn build_app_with_analyzer(
    base_url: Url,
    analyzer_timeout: Duration,
    request_timeout_secs: u64,
) -> Router {
    let config = ServerConfig {
        request_timeout_secs,
        analyzer_base_url: base_url.clone(),
        ..test_config()
    };
    let api = AnalyzerApi::new(base_url, analyzer_timeout);
    let state = AppState::new(config.clone(), Arc::new(api));
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body. `body` must already be
/// encoded.
pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Backend timeout error with the production deadline.
pub fn timeout_error() -> AnalyzerApiError {
    AnalyzerApiError::Timeout(Duration::from_secs(30))
}

pub fn server_error() -> AnalyzerApiError {
    AnalyzerApiError::Status {
        status: 500,
        status_text: "Internal Server Error".to_string(),
    }
}
