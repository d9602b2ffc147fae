use crate::error::Result;
use crate::objects::syntax::ByteCursor;
use std::fmt;

/// `%PDF-M.m` line followed by a comment of high bytes marking the file
/// as binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfHeader {
    major: u8,
    minor: u8,
}

const BINARY_MARKER: [u8; 4] = [0x81; 4];

impl PdfHeader {
    pub fn for_version(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn version(&self) -> (u8, u8) {
        (self.major, self.minor)
    }

    fn version_line(&self) -> String {
        format!("%PDF-{}.{}\n%", self.major, self.minor)
    }

    pub fn size_in_bytes(&self) -> usize {
        self.version_line().len() + BINARY_MARKER.len()
    }

    pub fn copy_bytes_into(&self, buffer: &mut [u8], offset: usize) -> Result<usize> {
        let mut out = ByteCursor::new(buffer, offset);
        out.put_str(&self.version_line())?;
        out.put(&BINARY_MARKER)?;
        Ok(out.written())
    }
}

impl fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version_line())?;
        for byte in BINARY_MARKER {
            write!(f, "{}", byte as char)?;
        }
        Ok(())
    }
}
