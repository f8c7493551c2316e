//! Text recognition endpoint
//!
//! POST / - recognise text in one uploaded image (field `file`).
//!
//! Non-image uploads are answered with a fixed explanatory note instead of
//! being forwarded: recognising text inside PDF documents would require
//! rasterizing pages first, and no rasterization collaborator exists here.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::{collect_uploads, MAX_UPLOAD_BYTES};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::{self, StoredBlob};

/// Note returned for uploads that are not images.
const UNSUPPORTED_INPUT_TEXT: &str = "Text recognition currently supports image uploads only. \
     Recognising text in PDF documents requires rasterizing pages to images, \
     which this server does not do.";

/// Recognition response body
#[derive(Serialize)]
pub struct RecognizeResponse {
    success: bool,
    text: String,
}

/// Create the recognition router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(recognize_text))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn recognize_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RecognizeResponse>> {
    let uploads = collect_uploads(state.storage(), &mut multipart, "file", 1).await?;

    let result = run_recognize(&state, &uploads.blobs).await;
    storage::release(state.storage(), &uploads.blobs).await;

    result.map(Json)
}

async fn run_recognize(state: &AppState, blobs: &[StoredBlob]) -> Result<RecognizeResponse> {
    let blob = blobs
        .first()
        .ok_or_else(|| AppError::Validation("no file uploaded in field 'file'".to_string()))?;

    if !blob.mime_type.starts_with("image/") {
        return Ok(RecognizeResponse {
            success: true,
            text: UNSUPPORTED_INPUT_TEXT.to_string(),
        });
    }

    let data = state.storage().open(blob).await?;
    let text = state.recognizer().recognize(&data, &blob.mime_type).await?;

    Ok(RecognizeResponse {
        success: true,
        text,
    })
}
