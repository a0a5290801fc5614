//! HTTP handlers for the copywriter service.

pub mod copy;
pub mod health;
pub mod metrics;

use axum::http::StatusCode;

/// Any unknown path, or a known path with the wrong method.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
