use crate::error::Result;
use crate::objects::syntax::ByteCursor;
use crate::objects::Dictionary;
use std::fmt;

/// `trailer` keyword followed by the trailer dictionary (classic layout only).
#[derive(Debug, Clone, PartialEq)]
pub struct PdfTrailerDict {
    dict: Dictionary,
}

impl PdfTrailerDict {
    pub fn of(dict: Dictionary) -> Self {
        Self { dict }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    pub fn size_in_bytes(&self) -> Result<usize> {
        Ok("trailer\n".len() + self.dict.size_in_bytes()?)
    }

    pub fn copy_bytes_into(&self, buffer: &mut [u8], offset: usize) -> Result<usize> {
        let mut out = ByteCursor::new(buffer, offset);
        out.put(b"trailer\n")?;
        self.dict.emit(&mut out)?;
        Ok(out.written())
    }
}

impl fmt::Display for PdfTrailerDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trailer\n{}", self.dict)
    }
}

/// `startxref` pointer to the last cross-reference section and the end
/// of file marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfTrailer {
    last_xref_offset: usize,
}

impl PdfTrailer {
    pub fn for_last_cross_ref_section_offset(offset: usize) -> Self {
        Self {
            last_xref_offset: offset,
        }
    }

    pub fn last_xref_offset(&self) -> usize {
        self.last_xref_offset
    }

    pub fn size_in_bytes(&self) -> usize {
        self.to_string().len()
    }

    pub fn copy_bytes_into(&self, buffer: &mut [u8], offset: usize) -> Result<usize> {
        let mut out = ByteCursor::new(buffer, offset);
        out.put_str(&self.to_string())?;
        Ok(out.written())
    }
}

impl fmt::Display for PdfTrailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "startxref\n{}\n%%EOF", self.last_xref_offset)
    }
}
