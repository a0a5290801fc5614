//! Prometheus metrics for copywriter-service.
//!
//! Recording helpers are no-ops until [`init_metrics`] has run, so handlers
//! can be exercised in tests without a registry.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static COPYWRITER_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static INFERENCE_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static INFERENCE_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new(
            "copywriter_requests_total",
            "Total copy generation requests by endpoint and outcome",
        ),
        &["endpoint", "status"],
    )?;

    let inference_latency = HistogramVec::new(
        HistogramOpts::new(
            "inference_latency_seconds",
            "Inference backend latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
    )?;

    let inference_errors = IntCounterVec::new(
        Opts::new("inference_errors_total", "Total inference backend errors"),
        &["model", "error_type"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(inference_latency.clone()))?;
    registry.register(Box::new(inference_errors.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = COPYWRITER_REQUESTS_TOTAL.set(requests_total);
    let _ = INFERENCE_LATENCY_SECONDS.set(inference_latency);
    let _ = INFERENCE_ERRORS_TOTAL.set(inference_errors);

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a finished copy request.
pub fn record_request(endpoint: &str, status: &str) {
    if let Some(counter) = COPYWRITER_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[endpoint, status]).inc();
    }
}

/// Record inference latency.
pub fn record_inference_latency(model: &str, duration_secs: f64) {
    if let Some(histogram) = INFERENCE_LATENCY_SECONDS.get() {
        histogram.with_label_values(&[model]).observe(duration_secs);
    }
}

/// Record an inference error.
pub fn record_inference_error(model: &str, error_type: &str) {
    if let Some(counter) = INFERENCE_ERRORS_TOTAL.get() {
        counter.with_label_values(&[model, error_type]).inc();
    }
}
