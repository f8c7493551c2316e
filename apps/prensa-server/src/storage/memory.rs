//! In-memory blob store for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{BlobHandle, BlobStore, StorageError, StoredBlob};

/// Test fake keeping blobs in a map keyed by handle.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn save(
        &self,
        original_name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<StoredBlob, StorageError> {
        let handle = BlobHandle::new();
        self.blobs
            .lock()
            .unwrap()
            .insert(handle.as_str().to_string(), data.to_vec());

        Ok(StoredBlob {
            handle,
            mime_type: mime_type.to_string(),
            original_name: original_name.to_string(),
            size: data.len() as u64,
        })
    }

    async fn open(&self, blob: &StoredBlob) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .lock()
            .unwrap()
            .get(blob.handle.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound(blob.handle.to_string()))
    }

    async fn delete(&self, blob: &StoredBlob) -> Result<(), StorageError> {
        self.blobs
            .lock()
            .unwrap()
            .remove(blob.handle.as_str())
            .map(|_| ())
            .ok_or_else(|| StorageError::Delete(format!("{} already removed", blob.handle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_roundtrip() {
        let store = MemoryStore::new();
        let blob = store.save("a.png", "image/png", b"bytes").await.unwrap();
        assert_eq!(store.open(&blob).await.unwrap(), b"bytes");

        store.delete(&blob).await.unwrap();
        assert!(store.is_empty());
        assert!(store.delete(&blob).await.is_err());
    }
}
