//! Filesystem spool store
//!
//! Blobs are written under a single spool directory with uuid file names;
//! the original file name only survives in the blob metadata, never on disk.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::types::{BlobHandle, BlobStore, StorageError, StoredBlob};

/// Blob store backed by a local spool directory.
#[derive(Debug, Clone)]
pub struct SpoolStore {
    root: PathBuf,
}

impl SpoolStore {
    /// Create a store over an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the spool directory if needed and return a store over it.
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, handle: &BlobHandle) -> PathBuf {
        self.root.join(handle.as_str())
    }
}

#[async_trait]
impl BlobStore for SpoolStore {
    async fn save(
        &self,
        original_name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<StoredBlob, StorageError> {
        let handle = BlobHandle::new();
        let path = self.blob_path(&handle);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| StorageError::Write(format!("{}: {}", path.display(), e)))?;

        Ok(StoredBlob {
            handle,
            mime_type: mime_type.to_string(),
            original_name: original_name.to_string(),
            size: data.len() as u64,
        })
    }

    async fn open(&self, blob: &StoredBlob) -> Result<Vec<u8>, StorageError> {
        let path = self.blob_path(&blob.handle);

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(blob.handle.to_string())
            } else {
                StorageError::Read(format!("{}: {}", path.display(), e))
            }
        })
    }

    async fn delete(&self, blob: &StoredBlob) -> Result<(), StorageError> {
        let path = self.blob_path(&blob.handle);

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| StorageError::Delete(format!("{}: {}", path.display(), e)))
    }
}
