//! Health and metrics endpoint tests.
//!
//! The application runs against the mock inference provider, so no
//! Cloudflare credentials are needed.

mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::{body_json, post_json, test_config, TestApp};
use copywriter_service::config::{ImageEncoding, PromptFormat};
use copywriter_service::services::metrics::init_metrics;
use copywriter_service::services::providers::mock::MockInferenceProvider;
use copywriter_service::services::providers::ProviderError;
use copywriter_service::startup::Application;
use reqwest::Client;
use std::sync::Once;

static INIT_METRICS: Once = Once::new();

fn ensure_metrics_initialized() {
    INIT_METRICS.call_once(|| {
        init_metrics().expect("Failed to initialize metrics");
    });
}

/// Spawn the application on a random port and return the port number.
async fn spawn_app() -> u16 {
    let mut config = test_config(PromptFormat::Conversation, ImageEncoding::Base64);
    config.common.port = 0;

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(app.run_until_stopped());
    port
}

#[tokio::test]
async fn health_check_works() {
    let port = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "copywriter-service");
    assert_eq!(body["provider"], "mock");
    assert_eq!(body["prompt_format"], "conversation");
    assert_eq!(body["image_encoding"], "base64");
}

#[tokio::test]
async fn health_check_reports_unhealthy_provider() {
    let app = TestApp::new(MockInferenceProvider::failing(|| {
        ProviderError::NotConfigured("Cloudflare account id not configured".to_string())
    }));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("account id not configured"));
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_format() {
    ensure_metrics_initialized();
    let app = TestApp::new(MockInferenceProvider::default());

    app.send(post_json(
        "/social-posts",
        r#"{"description":"A red ceramic mug."}"#,
    ))
    .await;

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .expect("Missing content-type header")
        .to_str()
        .expect("Invalid content-type")
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = common::body_text(response).await;
    assert!(
        body.contains("copywriter_requests_total"),
        "Unexpected metrics output: {}",
        body
    );
}

#[tokio::test]
async fn rejected_bodies_are_counted() {
    ensure_metrics_initialized();
    let app = TestApp::new(MockInferenceProvider::default());

    let oversized = format!(r#"{{"description":"{}"}}"#, "x".repeat(128 * 1024));
    let response = app.send(post_json("/image-description", &oversized)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let body = common::body_text(app.send(request).await).await;
    assert!(
        body.contains(r#"copywriter_requests_total{endpoint="image_description",status="413"}"#),
        "Unexpected metrics output: {}",
        body
    );
}
