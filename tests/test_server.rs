//! Integration test: server API endpoints

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
        n_estimators: 10,
        shap_samples: 8,
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

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_features_lists_four_columns_with_default_selection() {
    let app = test_app();
    let response = app.oneshot(get("/api/features")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 4);
    assert_eq!(features[0], "sepal_length");
    assert_eq!(json["selected"], "sepal_length");
}

#[tokio::test]
async fn test_select_updates_reported_selection() {
    let app = test_app();

    let body = serde_json::json!({ "feature": "sepal_width" });
    let response = app
        .clone()
        .oneshot(post_json("/api/select", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["selected"], "sepal_width");
    assert_eq!(json["histogram"]["title"], "SHAP values for sepal_width");

    let response = app.oneshot(get("/api/features")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["selected"], "sepal_width");
}

#[tokio::test]
async fn test_select_is_idempotent() {
    let app = test_app();
    let body = serde_json::json!({ "feature": "petal_length" });

    let first = app
        .clone()
        .oneshot(post_json("/api/select", &body))
        .await
        .unwrap();
    let second = app
        .oneshot(post_json("/api/select", &body))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(first).await, body_json(second).await);
}

#[tokio::test]
async fn test_select_unknown_feature_is_404() {
    let app = test_app();

    let body = serde_json::json!({ "feature": "petal_area" });
    let response = app
        .clone()
        .oneshot(post_json("/api/select", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], true);

    // A rejected selection must not change the state
    let response = app.oneshot(get("/api/features")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["selected"], "sepal_length");
}

#[tokio::test]
async fn test_histogram_covers_every_row() {
    let app = test_app();
    let response = app.oneshot(get("/api/histogram")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let counts = json["counts"].as_array().unwrap();
    let total: u64 = counts.iter().map(|c| c.as_u64().unwrap()).sum();
    assert_eq!(total, 150);

    let edges = json["bin_edges"].as_array().unwrap();
    assert_eq!(edges.len(), counts.len() + 1);
}

#[tokio::test]
async fn test_histogram_by_name() {
    let app = test_app();
    let response = app
        .oneshot(get("/api/histogram/petal_width"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "SHAP values for petal_width");
}

#[tokio::test]
async fn test_histogram_by_unknown_name_is_404() {
    let app = test_app();
    let response = app
        .oneshot(get("/api/histogram/petal_area"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summary_has_one_entry_per_feature() {
    let app = test_app();
    let response = app.oneshot(get("/api/summary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["rows"], 150);
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 4);
    for f in features {
        assert!(f["mean_abs"].as_f64().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn test_root_serves_html() {
    let app = test_app();
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_api_route_is_404() {
    let app = test_app();
    let response = app.oneshot(get("/api/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], true);
}
