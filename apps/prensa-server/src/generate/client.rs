//! Generative-text client
//!
//! Thin proxy to an OpenAI-compatible chat-completions endpoint. The service
//! credential comes from configuration; requests made without one fail with a
//! configuration error so operators can tell them apart from user mistakes.

use crate::config::GenerateConfig;
use crate::error::AppError;

pub struct TextGenerator {
    client: reqwest::Client,
    config: GenerateConfig,
}

impl TextGenerator {
    pub fn new(config: GenerateConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Generate text for `prompt`, with `model` overriding the configured
    /// default.
    pub async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, AppError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "GENERATE_API_KEY is not set; the generative-text service is unavailable"
                    .to_string(),
            )
        })?;

        let model = model.unwrap_or(&self.config.default_model);

        let request = serde_json::json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }]
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Processing(format!("generative-text request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Processing(format!(
                "generative-text service returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response.json().await.map_err(|e| {
            AppError::Processing(format!("malformed generative-text response: {}", e))
        })?;

        result["choices"][0]["message"]["content"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                AppError::Processing(
                    "generative-text response contained no message content".to_string(),
                )
            })
    }
}
