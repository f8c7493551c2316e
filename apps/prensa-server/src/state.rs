//! Application state management

use std::io;
use std::sync::Arc;

use crate::config::Config;
use crate::generate::TextGenerator;
use crate::ocr::{TextRecognizer, VisionOcrClient};
use crate::storage::{BlobStore, SpoolStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    storage: Arc<dyn BlobStore>,
    recognizer: Arc<dyn TextRecognizer>,
    generator: TextGenerator,
}

impl AppState {
    /// Create application state with the default collaborators.
    ///
    /// Creates the transient spool directory if it does not exist yet.
    pub fn new(config: Config) -> io::Result<Self> {
        let storage = SpoolStore::create(&config.storage.spool_dir)?;
        let recognizer = VisionOcrClient::new(&config.ocr);
        Ok(Self::from_parts(
            config,
            Arc::new(storage),
            Arc::new(recognizer),
        ))
    }

    /// Assemble state from injected collaborators.
    ///
    /// This is the seam tests use to swap the spool for an in-memory store or
    /// the recognizer for a mock.
    pub fn from_parts(
        config: Config,
        storage: Arc<dyn BlobStore>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        let generator = TextGenerator::new(config.generate.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                recognizer,
                generator,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the transient blob store
    pub fn storage(&self) -> &dyn BlobStore {
        self.inner.storage.as_ref()
    }

    /// Get the text recognizer
    pub fn recognizer(&self) -> &dyn TextRecognizer {
        self.inner.recognizer.as_ref()
    }

    /// Get the generative-text client
    pub fn generator(&self) -> &TextGenerator {
        &self.inner.generator
    }
}
