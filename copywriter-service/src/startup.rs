//! Application startup and lifecycle management.
//!
//! Builds the inference provider, assembles the router, and serves it until a
//! shutdown signal arrives.

use crate::config::{CopywriterConfig, InferenceConfig, ProviderKind};
use crate::handlers::{copy, health, metrics, not_found};
use crate::middleware::metrics::request_metrics_middleware;
use crate::services::providers::mock::MockInferenceProvider;
use crate::services::providers::workers_ai::{WorkersAiConfig, WorkersAiProvider};
use crate::services::providers::InferenceProvider;
use crate::services::{InferenceGateway, PromptBuilder};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{cors::cors_middleware, tracing::request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CopywriterConfig>,
    pub prompts: PromptBuilder,
    pub gateway: InferenceGateway,
}

impl AppState {
    pub fn new(config: CopywriterConfig, provider: Arc<dyn InferenceProvider>) -> Self {
        let gateway = InferenceGateway::new(provider, &config);
        let prompts = PromptBuilder::new(config.contract.prompt_format);

        Self {
            config: Arc::new(config),
            prompts,
            gateway,
        }
    }
}

/// Pick the inference backend named by configuration.
pub fn build_provider(config: &InferenceConfig) -> Result<Arc<dyn InferenceProvider>, AppError> {
    match config.provider {
        ProviderKind::WorkersAi => {
            let provider = WorkersAiProvider::new(WorkersAiConfig::from(config))
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => {
            tracing::warn!("Using mock inference provider");
            Ok(Arc::new(MockInferenceProvider::default()))
        }
    }
}

/// Every route answers only its own method; anything else falls through to 404.
///
/// CORS is the outermost layer so preflight requests never reach tracing or
/// handlers, and every other response picks up the CORS headers.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.contract.max_body_bytes;

    Router::new()
        .route(
            "/image-description",
            post(copy::describe_image).fallback(not_found),
        )
        .route(
            "/social-posts",
            post(copy::generate_social_posts).fallback(not_found),
        )
        .route("/health", get(health::health_check).fallback(not_found))
        .route("/metrics", get(metrics::metrics).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(from_fn(request_metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(cors_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: CopywriterConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config.inference)?;

        tracing::info!(
            provider = provider.name(),
            multimodal_model = %config.models.multimodal_model,
            text_model = %config.models.text_model,
            gateway = %config.gateway.id,
            prompt_format = config.contract.prompt_format.as_str(),
            image_encoding = config.contract.image_encoding.as_str(),
            "Initialized inference gateway"
        );

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let state = AppState::new(config, provider);

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Copywriter service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
