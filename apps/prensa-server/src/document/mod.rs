//! Document assembly engine
//!
//! Everything in here is a pure transformation over bytes: no I/O, no shared
//! state. Byte-level PDF encode/decode belongs to `lopdf`/`printpdf`; these
//! modules only select, copy, and construct page references.

pub mod assemble;
pub mod image;
pub mod range;

pub use assemble::{extract_pages, merge_documents};
pub use image::{build_document, ImageSource};
pub use range::PageSelection;
