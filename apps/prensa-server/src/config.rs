//! Configuration management for Prensa Server

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory for transient upload blobs. Everything written here is
    /// request-scoped and deleted before the response is finalised.
    pub spool_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Base URL of the vision-model endpoint used for text recognition.
    pub base_url: String,
    /// Vision model name (e.g. "llava").
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Chat-completions endpoint of the generative-text service.
    pub api_url: String,
    /// Bearer credential; requests fail with a configuration error when unset.
    pub api_key: Option<String>,
    /// Default model id, overridable per request.
    pub default_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                spool_dir: env::temp_dir().join("prensa-uploads"),
            },
            ocr: OcrConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llava".to_string(),
            },
            generate: GenerateConfig {
                api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
                api_key: None,
                default_model: "llama-3.1-8b-instant".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            storage: StorageConfig {
                spool_dir: env::var("SPOOL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.spool_dir),
            },
            ocr: OcrConfig {
                base_url: env::var("OCR_BASE_URL").unwrap_or(defaults.ocr.base_url),
                model: env::var("OCR_MODEL").unwrap_or(defaults.ocr.model),
            },
            generate: GenerateConfig {
                api_url: env::var("GENERATE_API_URL").unwrap_or(defaults.generate.api_url),
                api_key: env::var("GENERATE_API_KEY").ok(),
                default_model: env::var("GENERATE_MODEL").unwrap_or(defaults.generate.default_model),
            },
        }
    }
}
