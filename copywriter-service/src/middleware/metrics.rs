use crate::services::{metrics, Endpoint};
use axum::{extract::Request, http::Method, middleware::Next, response::Response};

/// Counts every POST to a copy endpoint by final status, including bodies
/// rejected before the handler runs (e.g. 413 from the body limit).
pub async fn request_metrics_middleware(req: Request, next: Next) -> Response {
    let endpoint = if req.method() == Method::POST {
        Endpoint::from_path(req.uri().path())
    } else {
        None
    };

    let response = next.run(req).await;

    if let Some(endpoint) = endpoint {
        metrics::record_request(endpoint.as_str(), response.status().as_str());
    }

    response
}
