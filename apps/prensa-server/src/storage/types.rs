//! Storage types

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Opaque handle to a blob inside a [`BlobStore`].
///
/// Handles are unique per request (uuid v4), so concurrent requests never
/// collide in the spool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobHandle(String);

impl BlobHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlobHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transient uploaded blob, owned by the current request.
///
/// Created by the upload path before the assembly engine runs; destroyed
/// exactly once by [`super::release`] on every exit path.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub handle: BlobHandle,
    pub mime_type: String,
    pub original_name: String,
    pub size: u64,
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to write blob: {0}")]
    Write(String),

    #[error("failed to read blob: {0}")]
    Read(String),

    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("failed to delete blob: {0}")]
    Delete(String),
}

/// Store for request-scoped binary blobs, addressed by opaque handles.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` and return the blob descriptor owning its handle.
    async fn save(
        &self,
        original_name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<StoredBlob, StorageError>;

    /// Read a blob's bytes back.
    async fn open(&self, blob: &StoredBlob) -> Result<Vec<u8>, StorageError>;

    /// Remove a blob's underlying storage.
    async fn delete(&self, blob: &StoredBlob) -> Result<(), StorageError>;
}
