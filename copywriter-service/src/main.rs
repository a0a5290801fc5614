use copywriter_service::config::CopywriterConfig;
use copywriter_service::services::metrics::init_metrics;
use copywriter_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CopywriterConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "copywriter-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    tracing::info!(port = application.port(), "Starting copywriter-service");
    application.run_until_stopped().await?;

    Ok(())
}
