//! Recognition providers
//!
//! Defines the recognizer trait and the vision-model implementation.

use async_trait::async_trait;
use base64::Engine;
use thiserror::Error;

use crate::config::OcrConfig;
use crate::error::AppError;

/// Recognition error types
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("text recognition request failed: {0}")]
    Api(String),

    #[error("text recognition service returned a malformed payload: {0}")]
    Payload(String),
}

impl From<OcrError> for AppError {
    fn from(e: OcrError) -> Self {
        AppError::Processing(e.to_string())
    }
}

/// Text recognizer trait
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Extract the text visible in an image.
    async fn recognize(&self, image_data: &[u8], mime_type: &str) -> Result<String, OcrError>;
}

/// Vision-model recognition client (Ollama-style API)
pub struct VisionOcrClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl VisionOcrClient {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextRecognizer for VisionOcrClient {
    async fn recognize(&self, image_data: &[u8], _mime_type: &str) -> Result<String, OcrError> {
        let url = format!("{}/api/generate", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let request = serde_json::json!({
            "model": self.model,
            "prompt": "Extract all text from this image exactly as written. Return only the extracted text, nothing else.",
            "images": [image_base64],
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Api(format!("failed to call recognition service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api(format!(
                "recognition service returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::Payload(e.to_string()))?;

        Ok(result["response"].as_str().unwrap_or("").trim().to_string())
    }
}

/// Mock recognizer for testing
#[cfg(test)]
pub struct MockRecognizer {
    pub text: String,
}

#[cfg(test)]
#[async_trait]
impl TextRecognizer for MockRecognizer {
    async fn recognize(&self, _image_data: &[u8], _mime_type: &str) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}
