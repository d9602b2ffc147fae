//! Deflate step behind every `/FlateDecode` stream the writer emits

use crate::error::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// zlib-wrap `data` at the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let sink = Vec::with_capacity(data.len() / 2 + 16);
    let mut encoder = ZlibEncoder::new(sink, Compression::default());
    encoder.write_all(data).map_err(deflate_error)?;
    encoder.finish().map_err(deflate_error)
}

fn deflate_error(error: std::io::Error) -> PdfError {
    PdfError::CompressionError(format!("deflate failed: {error}"))
}
