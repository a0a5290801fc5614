//! Cloudflare Workers AI provider, reached through an AI Gateway.
//!
//! Requests go to `{base}/{account}/{gateway}/workers-ai/{model}` with the
//! gateway's cache controls sent as `cf-aig-*` headers. The REST envelope
//! (`{"result": ..., "success": ..., "errors": [...]}`) is unwrapped so callers
//! see the same value the in-worker `run` binding returns.

use super::{InferenceProvider, ProviderError, RunOptions};
use crate::config::InferenceConfig;
use crate::models::PromptPayload;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::Duration;

const SKIP_CACHE_HEADER: &str = "cf-aig-skip-cache";
const CACHE_TTL_HEADER: &str = "cf-aig-cache-ttl";

/// Workers AI provider configuration.
#[derive(Debug, Clone)]
pub struct WorkersAiConfig {
    pub base_url: String,
    pub account_id: String,
    pub api_token: Secret<String>,
    pub timeout: Duration,
}

impl From<&InferenceConfig> for WorkersAiConfig {
    fn from(config: &InferenceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

pub struct WorkersAiProvider {
    config: WorkersAiConfig,
    client: Client,
}

impl WorkersAiProvider {
    pub fn new(config: WorkersAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Build the gateway URL for the given gateway and model.
    fn run_url(&self, gateway_id: &str, model: &str) -> String {
        format!(
            "{}/{}/{}/workers-ai/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_id,
            gateway_id,
            model.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl InferenceProvider for WorkersAiProvider {
    fn name(&self) -> &'static str {
        "workers-ai"
    }

    async fn run(
        &self,
        model: &str,
        input: &PromptPayload,
        options: &RunOptions,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = self.run_url(&options.gateway.id, model);

        tracing::debug!(
            model = %model,
            gateway = %options.gateway.id,
            skip_cache = options.gateway.skip_cache,
            cache_ttl = options.gateway.cache_ttl_seconds,
            "Sending request to Workers AI"
        );

        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(self.config.api_token.expose_secret())
            .header(SKIP_CACHE_HEADER, &options.gateway.skip_cache.to_string())
            .header(
                CACHE_TTL_HEADER,
                &options.gateway.cache_ttl_seconds.to_string(),
            )
            .json(input)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                error = %error_text,
                "Workers AI returned error"
            );
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let envelope: RunResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            let messages: Vec<String> = envelope
                .errors
                .iter()
                .map(|e| match e.code {
                    Some(code) => format!("{} ({})", e.message, code),
                    None => e.message.clone(),
                })
                .collect();
            return Err(ProviderError::ApiError(if messages.is_empty() {
                "request was not successful".to_string()
            } else {
                messages.join("; ")
            }));
        }

        envelope
            .result
            .ok_or_else(|| ProviderError::InvalidResponse("missing result".to_string()))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.account_id.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Cloudflare account id not configured".to_string(),
            ));
        }
        if self.config.api_token.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Cloudflare API token not configured".to_string(),
            ));
        }
        Ok(())
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct RunResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}
