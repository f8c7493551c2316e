//! Text recognition proxy
//!
//! Prensa does not run a recognition engine itself; image uploads are
//! forwarded to an external vision-model endpoint. Non-image uploads are
//! answered with a fixed explanatory note at the route layer, since
//! recognising text inside PDF documents would first require rasterizing
//! pages, which this server does not do.

mod provider;

pub use provider::{OcrError, TextRecognizer, VisionOcrClient};

#[cfg(test)]
pub use provider::MockRecognizer;
