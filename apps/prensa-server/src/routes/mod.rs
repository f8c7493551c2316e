//! Route modules for Prensa Server

pub mod documents;
pub mod generate;
pub mod ocr;

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::AppError;
use crate::storage::{self, BlobStore, StoredBlob};

/// Per-blob upload ceiling, enforced at the router layer.
pub(crate) const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Everything read out of one multipart request body.
pub(crate) struct UploadSet {
    /// Blobs spooled from the file field, in upload order.
    pub blobs: Vec<StoredBlob>,
    /// Plain text fields (e.g. `range`), keyed by field name.
    pub fields: HashMap<String, String>,
}

/// Read a multipart body, spooling every `file_field` part into the store.
///
/// On any failure mid-read, blobs already spooled are released before the
/// error propagates; callers only ever own a fully acquired set.
pub(crate) async fn collect_uploads(
    store: &dyn BlobStore,
    multipart: &mut Multipart,
    file_field: &str,
    max_files: usize,
) -> Result<UploadSet, AppError> {
    let mut blobs: Vec<StoredBlob> = Vec::new();
    let mut fields = HashMap::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                storage::release(store, &blobs).await;
                return Err(AppError::Validation(format!("failed to read upload: {}", e)));
            }
        };

        let name = field.name().unwrap_or_default().to_string();

        if name == file_field {
            if blobs.len() >= max_files {
                storage::release(store, &blobs).await;
                return Err(AppError::Validation(format!(
                    "too many files in field '{}' (limit {})",
                    file_field, max_files
                )));
            }

            let original_name = field.file_name().unwrap_or("upload").to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            let data = match field.bytes().await {
                Ok(data) => data,
                Err(e) => {
                    storage::release(store, &blobs).await;
                    return Err(AppError::Validation(format!(
                        "failed to read file data: {}",
                        e
                    )));
                }
            };

            match store.save(&original_name, &mime_type, &data).await {
                Ok(blob) => {
                    tracing::debug!(
                        handle = %blob.handle,
                        original_name = %blob.original_name,
                        size = blob.size,
                        "Spooled transient upload"
                    );
                    blobs.push(blob);
                }
                Err(e) => {
                    storage::release(store, &blobs).await;
                    return Err(e.into());
                }
            }
        } else if !name.is_empty() {
            match field.text().await {
                Ok(value) => {
                    fields.insert(name, value);
                }
                Err(e) => {
                    storage::release(store, &blobs).await;
                    return Err(AppError::Validation(format!(
                        "failed to read field '{}': {}",
                        name, e
                    )));
                }
            }
        }
    }

    Ok(UploadSet { blobs, fields })
}
