//! Integration tests for the server-rendered page.

mod common;

use std::time::{Duration, Instant};

use axum::http::{header, StatusCode};
use common::{body_text, get, post_form, sample_result, server_error, FakeBackend};

const FORM_BODY: &str =
    "code=for+i+in+range%28n%29%3A%0A++++total+%2B%3D+i&code_type=python&algorithm_name=suma";

// ---------------------------------------------------------------------------
// Test: GET / starts with the results area hidden
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_hides_results_before_any_analysis() {
    let app = common::build_test_app(FakeBackend::returning(sample_result()));

    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let page = body_text(response).await;
    assert!(page.contains(r#"class="results hidden""#));
    assert!(page.contains("Backend conectado"));
    assert!(!page.contains("{{"), "every template slot must be filled");
}

#[tokio::test]
async fn index_shows_offline_backend() {
    let backend = FakeBackend::returning(sample_result());
    backend.set_healthy(false);
    let app = common::build_test_app(backend);

    let page = body_text(get(app, "/").await).await;

    assert!(page.contains("Backend no disponible"));
}

#[tokio::test]
async fn index_uses_cached_backend_status() {
    let backend = FakeBackend::returning(sample_result());
    let app = common::build_test_app(backend.clone());

    let page = body_text(get(app.clone(), "/").await).await;
    assert!(page.contains("Backend conectado"));
    assert_eq!(backend.health_checks(), 0, "page loads must not call the backend");

    // A live check through /health refreshes what the page shows.
    backend.set_healthy(false);
    get(app.clone(), "/health").await;
    let page = body_text(get(app, "/").await).await;
    assert!(page.contains("Backend no disponible"));
    assert_eq!(backend.health_checks(), 1);
}

// ---------------------------------------------------------------------------
// Test: POST /analyze renders the report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_form_renders_report_and_success_notice() {
    let backend = FakeBackend::returning(sample_result());
    let app = common::build_test_app(backend.clone());

    let response = post_form(app.clone(), "/analyze", FORM_BODY).await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Análisis completado exitosamente"));
    assert!(!page.contains(r#"class="results hidden""#));
    assert!(page.contains(r#"id="big-o">O(n)<"#));
    assert!(page.contains("Recorrido lineal"));
    assert!(page.contains(r#"<option value="python" selected>"#));
    assert!(page.contains("total += i"));

    assert_eq!(backend.last_request().unwrap().algorithm_name, "suma");

    // The stored result survives a reload.
    let reloaded = body_text(get(app, "/").await).await;
    assert!(reloaded.contains(r#"id="big-o">O(n)<"#));
}

// ---------------------------------------------------------------------------
// Test: POST /analyze failures keep the code and hide the results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_form_validation_failure_keeps_code() {
    let backend = FakeBackend::returning(sample_result());
    let app = common::build_test_app(backend.clone());

    let response = post_form(app, "/analyze", "code=x+%3D+1&code_type=pseudocode").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let page = body_text(response).await;
    assert!(page.contains("El código es demasiado corto"));
    assert!(page.contains("x = 1"));
    assert!(page.contains(r#"class="results hidden""#));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn analyze_form_backend_failure_prefixes_message() {
    let app = common::build_test_app(FakeBackend::failing(server_error));

    let response = post_form(app, "/analyze", FORM_BODY).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = body_text(response).await;
    assert!(page.contains("Error en el análisis: HTTP 500: Internal Server Error"));
    assert!(page.contains(r#"class="results hidden""#));
}

#[tokio::test]
async fn analyze_form_escapes_submitted_code() {
    let app = common::build_test_app(FakeBackend::failing(server_error));

    let response = post_form(
        app,
        "/analyze",
        "code=%3Cscript%3Ealert%281%29%3C%2Fscript%3E&code_type=python",
    )
    .await;

    let page = body_text(response).await;
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!page.contains("<script>alert(1)</script>"));
}

// ---------------------------------------------------------------------------
// Test: POST /clear resets and redirects home
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_redirects_to_index_and_hides_results() {
    let app = common::build_test_app(FakeBackend::returning(sample_result()));

    post_form(app.clone(), "/analyze", FORM_BODY).await;
    let response = post_form(app.clone(), "/clear", "").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let page = body_text(get(app, "/").await).await;
    assert!(page.contains(r#"class="results hidden""#));
}

// ---------------------------------------------------------------------------
// Test: a hung backend yields the timeout notice, not a bare request timeout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_form_with_hung_backend_shows_timeout_notice() {
    let base_url = common::spawn_hanging_backend().await;
    let app = common::build_app_with_analyzer(base_url, Duration::from_millis(300), 2);

    let started = Instant::now();
    let response = post_form(app, "/analyze", FORM_BODY).await;
    let elapsed = started.elapsed();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(
        elapsed < Duration::from_secs(2),
        "answered after {elapsed:?}, past the request deadline"
    );
    let page = body_text(response).await;
    assert!(page.contains(
        "Error en el análisis: La solicitud tardó demasiado. El algoritmo puede ser muy complejo."
    ));
    assert!(page.contains(r#"class="results hidden""#));
}

#[tokio::test]
async fn index_with_hung_backend_renders_immediately() {
    let base_url = common::spawn_hanging_backend().await;
    let app = common::build_app_with_analyzer(base_url, Duration::from_secs(1), 2);

    let started = Instant::now();
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(body_text(response).await.contains("Backend no disponible"));
}
