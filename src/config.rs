// src/config.rs
use anyhow::{Context, Result, anyhow};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    pub bind_addr: String,
    pub request_timeout: Duration,
    pub max_upload_dim: u32,
    pub session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .or_else(|| get("GOOGLE_API_KEY"))
            .ok_or_else(|| anyhow!("GEMINI_API_KEY (or API_KEY / GOOGLE_API_KEY) must be set"))?;

        let request_timeout_secs = match get("ARCHVIZ_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("ARCHVIZ_REQUEST_TIMEOUT_SECS is not a number: {}", raw))?,
            None => 120,
        };
        let max_upload_dim = match get("ARCHVIZ_MAX_UPLOAD_DIM") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("ARCHVIZ_MAX_UPLOAD_DIM is not a number: {}", raw))?,
            None => 2048,
        };
        let session_ttl_secs = match get("ARCHVIZ_SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("ARCHVIZ_SESSION_TTL_SECS is not a number: {}", raw))?,
            None => 3600,
        };

        Ok(Self {
            api_key,
            api_base: get("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            image_model: get("ARCHVIZ_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            text_model: get("ARCHVIZ_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            bind_addr: get("ARCHVIZ_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_upload_dim,
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }
}
