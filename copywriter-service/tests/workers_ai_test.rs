//! Workers AI provider tests against a local mock HTTP server.

use copywriter_service::models::{ImageData, PromptPayload};
use copywriter_service::services::providers::workers_ai::{WorkersAiConfig, WorkersAiProvider};
use copywriter_service::services::providers::{
    GatewayPolicy, InferenceProvider, ProviderError, RunOptions,
};
use secrecy::Secret;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "cf/meta/llama-3.2-1b-instruct";
const RUN_PATH: &str = "/acct-123/beyond-rag/workers-ai/cf/meta/llama-3.2-1b-instruct";

fn provider(server: &MockServer) -> WorkersAiProvider {
    WorkersAiProvider::new(WorkersAiConfig {
        base_url: server.uri(),
        account_id: "acct-123".to_string(),
        api_token: Secret::new("test-token".to_string()),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build provider")
}

fn options() -> RunOptions {
    RunOptions::from(&GatewayPolicy {
        id: "beyond-rag".to_string(),
        skip_cache: false,
        cache_ttl_seconds: 300,
    })
}

fn payload() -> PromptPayload {
    PromptPayload::Flat {
        prompt: "Generate a single-paragraph product description based on the provided image."
            .to_string(),
        image: Some(ImageData::Bytes(vec![1, 2, 3])),
    }
}

#[tokio::test]
async fn run_posts_payload_through_gateway_and_unwraps_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header("cf-aig-skip-cache", "false"))
        .and(header("cf-aig-cache-ttl", "300"))
        .and(body_json(json!({
            "prompt": "Generate a single-paragraph product description based on the provided image.",
            "image": [1, 2, 3]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"response": "A sturdy red mug."},
            "success": true,
            "errors": [],
            "messages": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server)
        .run(MODEL, &payload(), &options())
        .await
        .expect("run should succeed");

    assert_eq!(result, json!({"response": "A sturdy red mug."}));
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .run(MODEL, &payload(), &options())
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("internal failure"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider(&server)
        .run(MODEL, &payload(), &options())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn unsuccessful_envelope_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": null,
            "success": false,
            "errors": [{"code": 5007, "message": "No such model"}]
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .run(MODEL, &payload(), &options())
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(message) => assert_eq!(message, "No such model (5007)"),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_result_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let err = provider(&server)
        .run(MODEL, &payload(), &options())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let provider = WorkersAiProvider::new(WorkersAiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        account_id: "acct-123".to_string(),
        api_token: Secret::new("test-token".to_string()),
        timeout: Duration::from_secs(2),
    })
    .expect("Failed to build provider");

    let err = provider
        .run(MODEL, &payload(), &options())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)));
}
