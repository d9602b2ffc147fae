use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid object reference: {0}")]
    InvalidReference(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Encryption error: {0}")]
    EncryptionError(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Unsupported security handler revision: {0}")]
    UnsupportedSecurityHandler(u32),

    #[error("Cannot wrap native value: {0}")]
    InvalidNativeValue(String),

    #[error("Size mismatch for {context}: expected {expected} bytes, wrote {actual}")]
    SizeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Output buffer too small: need {needed} bytes, {available} available")]
    BufferTooSmall { needed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_pdf_error_display() {
        let error = PdfError::InvalidStructure("test message".to_string());
        assert_eq!(error.to_string(), "Invalid PDF structure: test message");
    }

    #[test]
    fn test_pdf_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let pdf_error = PdfError::from(io_error);

        match pdf_error {
            PdfError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_size_mismatch_display() {
        let error = PdfError::SizeMismatch {
            context: "4 0 R".to_string(),
            expected: 12,
            actual: 11,
        };
        assert_eq!(
            error.to_string(),
            "Size mismatch for 4 0 R: expected 12 bytes, wrote 11"
        );
    }

    #[test]
    fn test_all_pdf_error_variants() {
        let errors = vec![
            PdfError::InvalidStructure("structure error".to_string()),
            PdfError::InvalidReference("1 0 R".to_string()),
            PdfError::CompressionError("compression error".to_string()),
            PdfError::EncryptionError("cipher error".to_string()),
            PdfError::InvalidPassword("bad char".to_string()),
            PdfError::UnsupportedSecurityHandler(5),
            PdfError::InvalidNativeValue("NUL in name".to_string()),
            PdfError::BufferTooSmall {
                needed: 10,
                available: 2,
            },
        ];

        for error in errors {
            let error_string = error.to_string();
            assert!(!error_string.is_empty());
        }
    }
}
