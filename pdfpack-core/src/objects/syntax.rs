//! Low-level token encoding shared by every object kind

use crate::error::{PdfError, Result};
use std::fmt::Write as _;

/// Write position inside a caller-provided output buffer.
pub(crate) struct ByteCursor<'a> {
    buffer: &'a mut [u8],
    start: usize,
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(buffer: &'a mut [u8], offset: usize) -> Self {
        Self {
            buffer,
            start: offset,
            offset,
        }
    }

    pub(crate) fn put(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.offset + bytes.len();
        let available = self.buffer.len();
        let slot = self
            .buffer
            .get_mut(self.offset..end)
            .ok_or(PdfError::BufferTooSmall {
                needed: end,
                available,
            })?;
        slot.copy_from_slice(bytes);
        self.offset = end;
        Ok(())
    }

    pub(crate) fn put_str(&mut self, text: &str) -> Result<()> {
        self.put(text.as_bytes())
    }

    pub(crate) fn put_byte(&mut self, byte: u8) -> Result<()> {
        self.put(&[byte])
    }

    pub(crate) fn written(&self) -> usize {
        self.offset - self.start
    }
}

/// Shortest decimal form without exponent. Non-finite values and negative
/// zero are written as `0`.
pub(crate) fn format_real(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// `/Name` with irregular bytes written as `#XX`.
pub(crate) fn encode_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len() + 1);
    encoded.push('/');
    for &byte in name.as_bytes() {
        if byte < b'!' || byte > b'~' || byte == b'#' || is_delimiter(byte) {
            let _ = write!(encoded, "#{byte:02X}");
        } else {
            encoded.push(byte as char);
        }
    }
    encoded
}

/// `(text)` with backslash, and both parentheses escaped.
pub(crate) fn encode_literal(bytes: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(bytes.len() + 2);
    encoded.push(b'(');
    for &byte in bytes {
        if matches!(byte, b'\\' | b'(' | b')') {
            encoded.push(b'\\');
        }
        encoded.push(byte);
    }
    encoded.push(b')');
    encoded
}

pub(crate) fn literal_size(bytes: &[u8]) -> usize {
    let escapes = bytes
        .iter()
        .filter(|b| matches!(b, b'\\' | b'(' | b')'))
        .count();
    bytes.len() + escapes + 2
}

pub(crate) fn utf16_be_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Bytes of a PDF text string: Latin-1 when every char fits in one byte,
/// UTF-16BE with a byte order mark otherwise.
pub(crate) fn text_string_bytes(text: &str) -> Vec<u8> {
    if text.chars().all(|c| (c as u32) <= 0xFF) {
        text.chars().map(|c| c as u8).collect()
    } else {
        utf16_be_with_bom(text)
    }
}

/// Debug rendering of arbitrary bytes, one char per byte.
pub(crate) fn bytes_as_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
