//! Integration test: embedded web UI structure

use explainboard::dataset::Dataset;
use explainboard::pipeline::{ExplainPipeline, PipelineConfig};
use explainboard::server::{create_router, AppState, ServerConfig};
use std::sync::Arc;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let dataset = Dataset::iris().unwrap();
    let output = ExplainPipeline::new(PipelineConfig {
        n_estimators: 5,
        shap_samples: 4,
        ..PipelineConfig::default()
    })
    .run(&dataset)
    .unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let state = Arc::new(AppState::new(config, output).unwrap());
    create_router(state)
}

async fn get_index_html() -> String {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_has_selector_and_chart_region() {
    let html = get_index_html().await;
    assert!(html.contains("id=\"feature-select\""), "Missing feature dropdown");
    assert!(html.contains("id=\"shap-chart\""), "Missing chart canvas");
    assert!(html.contains("id=\"summary-cards\""), "Missing summary cards container");
}

#[tokio::test]
async fn test_index_has_original_page_chrome() {
    let html = get_index_html().await;
    assert!(html.contains("Model Explanations Dashboard"), "Missing page heading");
    assert!(
        html.contains("Select Feature to Visualize:"),
        "Missing selector label"
    );
    assert!(
        html.contains("how much each feature contributes"),
        "Missing explanatory footer note"
    );
}

#[tokio::test]
async fn test_chart_js_loaded() {
    let html = get_index_html().await;
    assert!(html.contains("chart.umd.min.js"), "Chart.js should be loaded");
}

#[tokio::test]
async fn test_javascript_functions_exist() {
    let html = get_index_html().await;
    assert!(html.contains("function renderHistogram"), "Missing renderHistogram JS function");
    assert!(html.contains("async function loadFeatures"), "Missing loadFeatures JS function");
    assert!(html.contains("async function selectFeature"), "Missing selectFeature JS function");
    assert!(html.contains("async function loadSummary"), "Missing loadSummary JS function");
}

#[tokio::test]
async fn test_page_calls_the_api() {
    let html = get_index_html().await;
    for endpoint in ["/api/features", "/api/select", "/api/histogram", "/api/summary"] {
        assert!(html.contains(endpoint), "Page never calls {}", endpoint);
    }
}

#[tokio::test]
async fn test_index_has_inline_styles() {
    let html = get_index_html().await;
    assert!(html.contains("<style>"), "Index must have inline styles");
    assert!(html.contains("--color-text"), "Index must define CSS custom properties");
}
