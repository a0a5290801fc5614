use crate::models::ImageData;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Default request body ceiling (10MB). Byte-array images inflate ~4x in JSON.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_CACHE_TTL_SECONDS: u32 = 300;

const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct CopywriterConfig {
    pub common: core_config::Config,
    pub models: ModelConfig,
    pub gateway: GatewayConfig,
    pub inference: InferenceConfig,
    pub contract: ContractConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Image+text model used for product descriptions.
    pub multimodal_model: String,
    /// Text-only model used for social posts.
    pub text_model: String,
}

/// AI gateway routing and cache settings attached to every inference call.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub id: String,
    pub skip_cache: bool,
    pub cache_ttl_seconds: u32,
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub account_id: String,
    pub api_token: Secret<String>,
    pub timeout_secs: u64,
}

/// The request/payload contract this deployment speaks.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    pub prompt_format: PromptFormat,
    pub image_encoding: ImageEncoding,
    pub max_body_bytes: usize,
}

impl CopywriterConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = common.is_prod();

        let provider: ProviderKind =
            parse_env("INFERENCE_PROVIDER", Some("workers-ai"), is_prod)?;

        // Credentials only matter when talking to the real backend.
        let (account_id, api_token) = match provider {
            ProviderKind::WorkersAi => (
                get_env("CLOUDFLARE_ACCOUNT_ID", None, is_prod)?,
                get_env("CLOUDFLARE_API_TOKEN", None, is_prod)?,
            ),
            ProviderKind::Mock => (String::new(), String::new()),
        };

        Ok(CopywriterConfig {
            common,
            models: ModelConfig {
                multimodal_model: get_env(
                    "COPYWRITER_MULTIMODAL_MODEL",
                    Some("@cf/meta/llama-3.2-11b-vision-instruct"),
                    is_prod,
                )?,
                text_model: get_env(
                    "COPYWRITER_TEXT_MODEL",
                    Some("@cf/meta/llama-3.2-1b-instruct"),
                    is_prod,
                )?,
            },
            gateway: GatewayConfig {
                id: get_env("AI_GATEWAY_ID", Some("beyond-rag"), is_prod)?,
                skip_cache: parse_env("AI_GATEWAY_SKIP_CACHE", Some("false"), is_prod)?,
                cache_ttl_seconds: parse_env(
                    "AI_GATEWAY_CACHE_TTL_SECONDS",
                    Some(&DEFAULT_CACHE_TTL_SECONDS.to_string()),
                    is_prod,
                )?,
            },
            inference: InferenceConfig {
                provider,
                base_url: get_env(
                    "CLOUDFLARE_API_BASE_URL",
                    Some("https://gateway.ai.cloudflare.com/v1"),
                    is_prod,
                )?,
                account_id,
                api_token: Secret::new(api_token),
                timeout_secs: parse_env(
                    "INFERENCE_TIMEOUT_SECS",
                    Some(&DEFAULT_INFERENCE_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?,
            },
            contract: ContractConfig {
                prompt_format: parse_env("COPYWRITER_PROMPT_FORMAT", Some("flat"), is_prod)?,
                image_encoding: parse_env("COPYWRITER_IMAGE_ENCODING", Some("bytes"), is_prod)?,
                max_body_bytes: parse_env(
                    "COPYWRITER_MAX_BODY_BYTES",
                    Some(&DEFAULT_MAX_BODY_BYTES.to_string()),
                    is_prod,
                )?,
            },
        })
    }
}

/// Which inference backend serves `run` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    WorkersAi,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workers-ai" => Ok(ProviderKind::WorkersAi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!("unknown inference provider '{}'", other)),
        }
    }
}

/// Shape of the payload handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptFormat {
    /// `{"prompt": "...", "image": ...}`
    Flat,
    /// `{"messages": [system, assistant, user], "image": ...}`
    Conversation,
}

impl PromptFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptFormat::Flat => "flat",
            PromptFormat::Conversation => "conversation",
        }
    }
}

impl FromStr for PromptFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(PromptFormat::Flat),
            "conversation" => Ok(PromptFormat::Conversation),
            other => Err(format!("unknown prompt format '{}'", other)),
        }
    }
}

/// The one image form `/image-description` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// JSON array of byte values.
    Bytes,
    /// Opaque encoded string, passed through untouched.
    Base64,
}

impl ImageEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageEncoding::Bytes => "bytes",
            ImageEncoding::Base64 => "base64",
        }
    }

    pub fn accepts(&self, image: &ImageData) -> bool {
        matches!(
            (self, image),
            (ImageEncoding::Bytes, ImageData::Bytes(_))
                | (ImageEncoding::Base64, ImageData::Encoded(_))
        )
    }
}

impl FromStr for ImageEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bytes" => Ok(ImageEncoding::Bytes),
            "base64" => Ok(ImageEncoding::Base64),
            other => Err(format!("unknown image encoding '{}'", other)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: Option<&str>, is_prod: bool) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(key, default, is_prod)?;
    raw.parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
