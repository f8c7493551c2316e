//! Image page builder: wrap raster images as single PDF pages
//!
//! Each supported image becomes exactly one page whose point dimensions equal
//! the image's pixel dimensions (72 dpi), with the image filling the page from
//! the origin: no scaling, no cropping, no margins.
//!
//! printpdf 0.8 uses a data-oriented API: pages are `PdfPage` structs holding
//! `Vec<Op>` operation lists, serialised via `PdfDocument::save()`.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::debug;

use crate::error::AppError;

/// One raster input: bytes plus the mime type declared by the uploader.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// The two raster formats accepted for page building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RasterFormat {
    Jpeg,
    Png,
}

/// Map a declared mime type to a supported format, `None` for anything else.
fn supported_format(mime_type: &str) -> Option<RasterFormat> {
    match mime_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(RasterFormat::Jpeg),
        "image/png" | "image/x-png" => Some(RasterFormat::Png),
        _ => None,
    }
}

const MM_PER_PT: f32 = 25.4 / 72.0;

/// One pixel maps to one point; page sizes are handed to printpdf in Mm.
fn px_to_mm(px: u32) -> Mm {
    Mm(px as f32 * MM_PER_PT)
}

/// Build one document from an ordered list of raster images.
///
/// Entries with an unsupported declared type are skipped: they contribute no
/// page and never abort the batch. A declared-supported image that fails to
/// decode aborts the whole batch with no partial output.
pub fn build_document(images: &[ImageSource]) -> Result<Vec<u8>, AppError> {
    let mut doc = PdfDocument::new("Converted Images");
    let mut pages: Vec<PdfPage> = Vec::new();

    for (index, source) in images.iter().enumerate() {
        if supported_format(&source.mime_type).is_none() {
            debug!(
                index,
                mime_type = %source.mime_type,
                "Skipping unsupported image type"
            );
            continue;
        }

        let decoded = image::load_from_memory(&source.data).map_err(|e| {
            AppError::Processing(format!("failed to decode image #{}: {}", index + 1, e))
        })?;

        let width_px = decoded.width();
        let height_px = decoded.height();

        let rgb = decoded.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: width_px as usize,
            height: height_px as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let image_id = doc.add_image(&raw);

        // At 72 dpi the image's native size in points equals its pixel size,
        // so an identity placement at the origin fills the page edge to edge.
        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(72.0),
                rotate: None,
            },
        }];

        pages.push(PdfPage::new(px_to_mm(width_px), px_to_mm(height_px), ops));
    }

    debug!(inputs = images.len(), pages = pages.len(), "Image pages built");

    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}
