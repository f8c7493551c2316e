//! Transient blob storage
//!
//! Uploaded bytes are spooled here before the assembly engine runs, and are
//! deleted again before the response is finalised. The store is an injected
//! abstraction over opaque handles so tests can swap the filesystem spool for
//! an in-memory fake.

mod spool;
mod types;

#[cfg(test)]
pub mod memory;

pub use spool::SpoolStore;
pub use types::{BlobHandle, BlobStore, StorageError, StoredBlob};

/// Release every blob in `blobs` exactly once.
///
/// Deletion failures are logged and swallowed; callers never handle a cleanup
/// error. Every request handler invokes this on both the success and the
/// failure path, after the primary result has been decided.
pub async fn release(store: &dyn BlobStore, blobs: &[StoredBlob]) {
    for blob in blobs {
        match store.delete(blob).await {
            Ok(()) => {
                tracing::debug!(handle = %blob.handle, "Transient blob released");
            }
            Err(e) => {
                tracing::warn!(handle = %blob.handle, error = %e, "Failed to release transient blob");
            }
        }
    }
}
