//! Static CORS policy.
//!
//! Every response carries the same three headers. Preflight requests are
//! answered here and never reach the router.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};

/// The fixed header set: any origin, POST only, any request header.
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(3);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers
}

pub fn is_preflight(method: &Method) -> bool {
    method == Method::OPTIONS
}

pub async fn cors_middleware(req: Request, next: Next) -> Response {
    if is_preflight(req.method()) {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;
        *response.headers_mut() = cors_headers();
        return response;
    }

    let mut response = next.run(req).await;
    response.headers_mut().extend(cors_headers());
    response
}
