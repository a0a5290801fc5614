use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Also advertises the request contract so clients can
/// tell which prompt shape and image form this deployment expects.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.gateway.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "copywriter-service",
                "version": env!("CARGO_PKG_VERSION"),
                "provider": state.gateway.provider_name(),
                "prompt_format": state.prompts.format().as_str(),
                "image_encoding": state.config.contract.image_encoding.as_str()
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "copywriter-service",
                "error": e.to_string()
            })),
        ),
    }
}
