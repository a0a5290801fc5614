//! Inference backend abstractions and implementations.
//!
//! The gateway treats the backend as an opaque `run(model, input, options)`
//! capability. Results come back as raw JSON and are never inspected.

pub mod mock;
pub mod workers_ai;

use crate::models::PromptPayload;
use async_trait::async_trait;
use serde::Serialize;
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => AppError::ServiceUnavailable(msg),
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

/// Cache and routing settings for one inference call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayPolicy {
    pub id: String,
    pub skip_cache: bool,
    #[serde(rename = "cacheTtl")]
    pub cache_ttl_seconds: u32,
}

/// Options passed alongside every `run` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOptions {
    pub gateway: GatewayPolicy,
}

impl From<&GatewayPolicy> for RunOptions {
    fn from(policy: &GatewayPolicy) -> Self {
        Self {
            gateway: policy.clone(),
        }
    }
}

/// An external model execution service.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Run `model` against `input` and return the backend's result verbatim.
    async fn run(
        &self,
        model: &str,
        input: &PromptPayload,
        options: &RunOptions,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
