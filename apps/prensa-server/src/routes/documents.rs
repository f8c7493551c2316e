//! Document conversion endpoints
//!
//! - POST /merge  - combine uploaded documents into one
//! - POST /split  - extract a page selection from one document
//! - POST /images - build a document out of raster images
//!
//! Handlers are thin: read the multipart body into transient blobs, run one
//! assembly operation to a `Result`, release every blob unconditionally, then
//! propagate the result. No blob outlives its request under any outcome.

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Router,
};

use super::{collect_uploads, UploadSet, MAX_UPLOAD_BYTES};
use crate::document::{self, ImageSource};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::{self, StoredBlob};

/// Most source documents accepted by one combine request.
const MAX_COMBINE_INPUTS: usize = 10;
/// Most images accepted by one conversion request.
const MAX_IMAGE_INPUTS: usize = 20;

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/merge", post(combine_documents))
        .route("/split", post(split_document))
        .route("/images", post(convert_images))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /merge
///
/// Combine two or more uploaded documents (field `files`) into one.
async fn combine_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let uploads =
        collect_uploads(state.storage(), &mut multipart, "files", MAX_COMBINE_INPUTS).await?;

    let result = run_combine(&state, &uploads.blobs).await;
    storage::release(state.storage(), &uploads.blobs).await;

    pdf_response(result?, "merged_document.pdf")
}

async fn run_combine(state: &AppState, blobs: &[StoredBlob]) -> Result<Vec<u8>> {
    if blobs.len() < 2 {
        return Err(AppError::Validation(format!(
            "at least 2 documents are required to combine, got {}",
            blobs.len()
        )));
    }

    let mut sources = Vec::with_capacity(blobs.len());
    for blob in blobs {
        sources.push(state.storage().open(blob).await?);
    }

    document::merge_documents(&sources)
}

/// POST /split
///
/// Extract pages (optional text field `range`) from one document (field `file`).
async fn split_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let uploads = collect_uploads(state.storage(), &mut multipart, "file", 1).await?;

    let result = run_split(&state, &uploads).await;
    storage::release(state.storage(), &uploads.blobs).await;

    let (bytes, filename) = result?;
    pdf_response(bytes, &filename)
}

async fn run_split(state: &AppState, uploads: &UploadSet) -> Result<(Vec<u8>, String)> {
    let blob = uploads.blobs.first().ok_or_else(|| {
        AppError::Validation("no document uploaded in field 'file'".to_string())
    })?;

    let range = uploads.fields.get("range").map(String::as_str);
    let source = state.storage().open(blob).await?;
    let bytes = document::extract_pages(&source, range)?;

    Ok((bytes, format!("split_{}", safe_filename(&blob.original_name))))
}

/// POST /images
///
/// Build one document from uploaded raster images (field `files`).
async fn convert_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let uploads =
        collect_uploads(state.storage(), &mut multipart, "files", MAX_IMAGE_INPUTS).await?;

    let result = run_convert(&state, &uploads.blobs).await;
    storage::release(state.storage(), &uploads.blobs).await;

    pdf_response(result?, "images_converted.pdf")
}

async fn run_convert(state: &AppState, blobs: &[StoredBlob]) -> Result<Vec<u8>> {
    if blobs.is_empty() {
        return Err(AppError::Validation(
            "no images uploaded in field 'files'".to_string(),
        ));
    }

    let mut images = Vec::with_capacity(blobs.len());
    for blob in blobs {
        images.push(ImageSource {
            data: state.storage().open(blob).await?,
            mime_type: blob.mime_type.clone(),
        });
    }

    document::build_document(&images)
}

/// Build a byte-stream response with a suggested download filename.
fn pdf_response(bytes: Vec<u8>, filename: &str) -> Result<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Processing(format!("failed to build response: {}", e)))
}

/// Keep suggested filenames header-safe: quotes, separators, and control
/// characters become underscores.
fn safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '"' | '/' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    if cleaned.is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::fixtures::{page_count, page_widths, png_bytes, sample_pdf};
    use axum::http::Request;
    use tower::ServiceExt;

    const BOUNDARY: &str = "prensa-test-boundary";

    fn file_part(field: &str, filename: &str, mime: &str, data: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(data);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn text_part(field: &str, value: &str) -> Vec<u8> {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n")
            .into_bytes()
    }

    fn multipart_request(uri: &str, parts: Vec<Vec<u8>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(&part);
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn test_app(spool: &std::path::Path) -> Router {
        let mut config = Config::default();
        config.storage.spool_dir = spool.to_path_buf();
        router().with_state(AppState::new(config).unwrap())
    }

    fn spool_is_empty(spool: &std::path::Path) -> bool {
        std::fs::read_dir(spool).unwrap().count() == 0
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn combine_merges_uploaded_documents() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = multipart_request(
            "/merge",
            vec![
                file_part("files", "a.pdf", "application/pdf", &sample_pdf(&[100, 110])),
                file_part(
                    "files",
                    "b.pdf",
                    "application/pdf",
                    &sample_pdf(&[120, 130, 140]),
                ),
            ],
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .unwrap()
                .to_str()
                .unwrap(),
            "attachment; filename=\"merged_document.pdf\""
        );

        let bytes = body_bytes(response).await;
        assert_eq!(
            page_widths(&bytes),
            vec![100.0, 110.0, 120.0, 130.0, 140.0]
        );
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn combine_with_one_document_is_rejected_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = multipart_request(
            "/merge",
            vec![file_part(
                "files",
                "only.pdf",
                "application/pdf",
                &sample_pdf(&[100]),
            )],
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn combine_enforces_the_input_cap() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let parts = (0..11)
            .map(|_| file_part("files", "x.pdf", "application/pdf", &sample_pdf(&[100])))
            .collect();

        let response = app.oneshot(multipart_request("/merge", parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn split_returns_pages_in_selection_order() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = multipart_request(
            "/split",
            vec![
                file_part(
                    "file",
                    "source.pdf",
                    "application/pdf",
                    &sample_pdf(&[100, 110, 120, 130, 140]),
                ),
                text_part("range", "3,1-2"),
            ],
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .unwrap()
                .to_str()
                .unwrap(),
            "attachment; filename=\"split_source.pdf\""
        );

        let bytes = body_bytes(response).await;
        assert_eq!(page_widths(&bytes), vec![120.0, 100.0, 110.0]);
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn split_without_range_returns_the_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = multipart_request(
            "/split",
            vec![file_part(
                "file",
                "source.pdf",
                "application/pdf",
                &sample_pdf(&[100, 110, 120]),
            )],
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body_bytes(response).await;
        assert_eq!(page_widths(&bytes), vec![100.0]);
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn split_cleans_up_after_a_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = multipart_request(
            "/split",
            vec![
                file_part("file", "bad.pdf", "application/pdf", b"not a pdf at all"),
                text_part("range", "1"),
            ],
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn images_builds_pages_and_skips_unsupported_types() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = multipart_request(
            "/images",
            vec![
                file_part("files", "a.png", "image/png", &png_bytes(100, 100)),
                file_part("files", "notes.txt", "text/plain", b"not an image"),
                file_part("files", "b.png", "image/png", &png_bytes(200, 200)),
            ],
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body_bytes(response).await;
        assert_eq!(page_count(&bytes), 2);
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn images_with_no_uploads_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let response = app
            .oneshot(multipart_request("/images", vec![]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(spool_is_empty(dir.path()));
    }
}
