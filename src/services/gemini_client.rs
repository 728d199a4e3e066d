// src/services/gemini_client.rs
use crate::config::AppConfig;
use crate::errors::StudioError;
use crate::services::backend::{GenerateContentRequest, GenerateContentResponse, ImageBackend};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Instant;

pub struct GeminiClient {
    api_key: String,
    api_base: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, StudioError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StudioError::BackendTransport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            client,
        })
    }

    pub fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{}", trimmed)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[async_trait]
impl ImageBackend for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, StudioError> {
        let start = Instant::now();
        let endpoint = self.endpoint_for_model(model);

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| StudioError::BackendTransport(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StudioError::BackendTransport(format!(
                "Gemini error ({}): {}",
                status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            StudioError::BackendTransport(format!("Failed to parse Gemini response: {}", e))
        })?;

        debug!(
            "{} answered with {} candidate(s) in {} ms",
            model,
            parsed.candidates.len(),
            start.elapsed().as_millis()
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> AppConfig {
        AppConfig {
            api_key: "k".to_string(),
            api_base: "https://example.test/v1beta".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            request_timeout: Duration::from_secs(5),
            max_upload_dim: 2048,
            session_ttl: Duration::from_secs(3600),
        }
    }

    #[test]
    fn endpoint_prefixes_models_path_once() {
        let client = GeminiClient::new(&config()).unwrap();
        assert_eq!(
            client.endpoint_for_model("gemini-2.5-flash-image"),
            "https://example.test/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
        assert_eq!(
            client.endpoint_for_model("models/gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
