use crate::config::ImageEncoding;
use crate::dtos::{ImageDescriptionRequest, SocialPostsRequest};
use crate::models::Language;
use crate::services::prompt_builder::applied_criteria;
use crate::services::Endpoint;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

pub async fn describe_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let endpoint = Endpoint::ImageDescription;
    let request: ImageDescriptionRequest = parse_body(&body)?;

    if request.image.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "image must not be empty"
        )));
    }

    let encoding = state.config.contract.image_encoding;
    if !encoding.accepts(&request.image) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "image must be sent as {}",
            expected_image_form(encoding)
        )));
    }

    let language = resolve_language(&headers);
    let has_criteria = applied_criteria(request.criteria.as_deref()).is_some();
    let payload =
        state
            .prompts
            .description_prompt(request.image, language, request.criteria.as_deref());

    let policy = state.gateway.policy(endpoint);
    tracing::info!(
        language = language.code(),
        model = %state.gateway.model(endpoint),
        gateway = %policy.id,
        cache_ttl = policy.cache_ttl_seconds,
        has_criteria,
        prompt_len = payload.instruction().len(),
        "Generating product description"
    );

    let output = state.gateway.invoke_for(endpoint, &payload).await?;
    Ok(Json(output))
}

pub async fn generate_social_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let endpoint = Endpoint::SocialPosts;
    let request: SocialPostsRequest = parse_body(&body)?;

    let language = resolve_language(&headers);
    let payload = state
        .prompts
        .social_post_prompt(&request.description, language);

    let policy = state.gateway.policy(endpoint);
    tracing::info!(
        language = language.code(),
        model = %state.gateway.model(endpoint),
        gateway = %policy.id,
        cache_ttl = policy.cache_ttl_seconds,
        prompt_len = payload.instruction().len(),
        "Generating social posts"
    );

    let output = state.gateway.invoke_for(endpoint, &payload).await?;
    Ok(Json(output))
}

/// Decode and validate a JSON body. No content type is required.
fn parse_body<T>(body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let request: T = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed request body");
        AppError::BadRequest(anyhow::anyhow!("Invalid request body: {}", e))
    })?;
    request.validate()?;
    Ok(request)
}

fn resolve_language(headers: &HeaderMap) -> Language {
    Language::from_header(
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    )
}

fn expected_image_form(encoding: ImageEncoding) -> &'static str {
    match encoding {
        ImageEncoding::Bytes => "an array of byte values",
        ImageEncoding::Base64 => "an encoded string",
    }
}
