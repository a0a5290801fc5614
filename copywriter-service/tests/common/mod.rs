//! Shared fixtures for copywriter-service integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use copywriter_service::config::{
    ContractConfig, CopywriterConfig, GatewayConfig, ImageEncoding, InferenceConfig, ModelConfig,
    PromptFormat, ProviderKind,
};
use copywriter_service::services::providers::mock::MockInferenceProvider;
use copywriter_service::startup::{build_router, AppState};
use secrecy::Secret;
use std::sync::Arc;

pub const MULTIMODAL_MODEL: &str = "@cf/meta/llama-3.2-11b-vision-instruct";
pub const TEXT_MODEL: &str = "@cf/meta/llama-3.2-1b-instruct";
pub const GATEWAY_ID: &str = "beyond-rag";

pub fn test_config(prompt_format: PromptFormat, image_encoding: ImageEncoding) -> CopywriterConfig {
    CopywriterConfig {
        common: Default::default(),
        models: ModelConfig {
            multimodal_model: MULTIMODAL_MODEL.to_string(),
            text_model: TEXT_MODEL.to_string(),
        },
        gateway: GatewayConfig {
            id: GATEWAY_ID.to_string(),
            skip_cache: false,
            cache_ttl_seconds: 300,
        },
        inference: InferenceConfig {
            provider: ProviderKind::Mock,
            base_url: String::new(),
            account_id: String::new(),
            api_token: Secret::new(String::new()),
            timeout_secs: 5,
        },
        contract: ContractConfig {
            prompt_format,
            image_encoding,
            max_body_bytes: 64 * 1024,
        },
    }
}

/// Router wired to a mock provider, plus a handle for inspecting its calls.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockInferenceProvider>,
}

impl TestApp {
    pub fn new(provider: MockInferenceProvider) -> Self {
        Self::with_config(
            provider,
            test_config(PromptFormat::Flat, ImageEncoding::Bytes),
        )
    }

    pub fn with_config(provider: MockInferenceProvider, config: CopywriterConfig) -> Self {
        let provider = Arc::new(provider);
        let state = AppState::new(config, provider.clone());
        Self {
            router: build_router(state),
            provider,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::util::ServiceExt;

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
