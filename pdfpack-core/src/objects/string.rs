use crate::encryption::ObjectEncrypter;
use crate::error::{PdfError, Result};
use crate::objects::syntax::{utf16_be_with_bom, ByteCursor};
use crate::objects::ObjectId;
use std::fmt;

/// String written as hex digits between angle brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexString {
    value: String,
    prevent_encryption: bool,
}

impl HexString {
    /// Wrap hex digits as given.
    pub fn of(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            prevent_encryption: false,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::of(hex::encode_upper(bytes))
    }

    /// UTF-16BE text with a byte order mark.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(&utf16_be_with_bom(text))
    }

    /// Mark this string as exempt from encryption.
    pub fn preventing_encryption(mut self) -> Self {
        self.prevent_encryption = true;
        self
    }

    pub fn prevents_encryption(&self) -> bool {
        self.prevent_encryption
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Decode the digits; an odd count is completed with a trailing `0`.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        let decoded = if self.value.len() % 2 == 1 {
            hex::decode(format!("{}0", self.value))
        } else {
            hex::decode(&self.value)
        };
        decoded.map_err(|e| PdfError::InvalidStructure(format!("bad hex string: {e}")))
    }

    pub fn size_in_bytes(&self) -> usize {
        self.value.len() + 2
    }

    pub(crate) fn emit(&self, out: &mut ByteCursor<'_>) -> Result<()> {
        out.put_byte(b'<')?;
        out.put_str(&self.value)?;
        out.put_byte(b'>')
    }

    pub fn encrypt_with(
        &self,
        encrypter: &mut dyn ObjectEncrypter,
        id: ObjectId,
    ) -> Result<Option<HexString>> {
        if self.prevent_encryption {
            return Ok(None);
        }
        let encrypted = encrypter.encrypt_object_content(&self.as_bytes()?, id)?;
        Ok(Some(HexString::from_bytes(&encrypted)))
    }
}

impl fmt::Display for HexString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.value)
    }
}
