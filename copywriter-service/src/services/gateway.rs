//! Inference gateway client.
//!
//! Pairs each endpoint with its model and a fixed [`GatewayPolicy`], and
//! forwards prompt payloads to the configured [`InferenceProvider`]. Results
//! are returned exactly as the provider produced them.

use crate::config::CopywriterConfig;
use crate::models::PromptPayload;
use crate::services::metrics;
use crate::services::providers::{GatewayPolicy, InferenceProvider, ProviderError, RunOptions};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ImageDescription,
    SocialPosts,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::ImageDescription => "image_description",
            Endpoint::SocialPosts => "social_posts",
        }
    }

    /// The endpoint served at `path`, if any.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/image-description" => Some(Endpoint::ImageDescription),
            "/social-posts" => Some(Endpoint::SocialPosts),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Route {
    model: String,
    policy: GatewayPolicy,
}

#[derive(Clone)]
pub struct InferenceGateway {
    provider: Arc<dyn InferenceProvider>,
    image_description: Route,
    social_posts: Route,
}

impl InferenceGateway {
    pub fn new(provider: Arc<dyn InferenceProvider>, config: &CopywriterConfig) -> Self {
        let policy = GatewayPolicy {
            id: config.gateway.id.clone(),
            skip_cache: config.gateway.skip_cache,
            cache_ttl_seconds: config.gateway.cache_ttl_seconds,
        };

        Self {
            provider,
            image_description: Route {
                model: config.models.multimodal_model.clone(),
                policy: policy.clone(),
            },
            social_posts: Route {
                model: config.models.text_model.clone(),
                policy,
            },
        }
    }

    fn route(&self, endpoint: Endpoint) -> &Route {
        match endpoint {
            Endpoint::ImageDescription => &self.image_description,
            Endpoint::SocialPosts => &self.social_posts,
        }
    }

    pub fn model(&self, endpoint: Endpoint) -> &str {
        &self.route(endpoint).model
    }

    pub fn policy(&self, endpoint: Endpoint) -> &GatewayPolicy {
        &self.route(endpoint).policy
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Run the endpoint's model with the endpoint's policy.
    pub async fn invoke_for(
        &self,
        endpoint: Endpoint,
        payload: &PromptPayload,
    ) -> Result<serde_json::Value, ProviderError> {
        let route = self.route(endpoint);
        self.invoke(&route.model, payload, &route.policy).await
    }

    /// Delegate one call to the provider. No retry.
    pub async fn invoke(
        &self,
        model: &str,
        payload: &PromptPayload,
        policy: &GatewayPolicy,
    ) -> Result<serde_json::Value, ProviderError> {
        let start = Instant::now();
        let result = self
            .provider
            .run(model, payload, &RunOptions::from(policy))
            .await;
        metrics::record_inference_latency(model, start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            metrics::record_inference_error(model, e.kind());
            tracing::error!(
                provider = self.provider.name(),
                model = %model,
                gateway = %policy.id,
                error = %e,
                "Inference call failed"
            );
        }

        result
    }

    pub async fn health_check(&self) -> Result<(), ProviderError> {
        self.provider.health_check().await
    }
}
