//! Streams whose payload is generated from a body and optionally deflated

use crate::cache::Cache;
use crate::compression::compress;
use crate::encryption::ObjectEncrypter;
use crate::error::{PdfError, Result};
use crate::objects::syntax::{bytes_as_text, ByteCursor};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::structures::{ObjectStream, Operator};

/// What a flate stream's uncompressed payload is generated from.
#[derive(Debug, Clone, PartialEq)]
pub enum FlateBody {
    /// Page or form content, one operator per line.
    Content(Vec<Operator>),
    /// Indirect objects packed into an object stream.
    Objects(ObjectStream),
    /// Arbitrary payload such as font files or image data.
    Bytes(Vec<u8>),
}

impl FlateBody {
    fn unencoded_contents(&self) -> Result<Vec<u8>> {
        match self {
            FlateBody::Content(operators) => {
                let mut size = 0;
                for op in operators {
                    size += op.size_in_bytes()? + 1;
                }
                let mut buffer = vec![0u8; size];
                let mut out = ByteCursor::new(&mut buffer, 0);
                for op in operators {
                    op.emit(&mut out)?;
                    out.put_byte(b'\n')?;
                }
                Ok(buffer)
            }
            FlateBody::Objects(group) => group.unencoded_contents(),
            FlateBody::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    fn text(&self) -> String {
        match self {
            FlateBody::Content(operators) => operators.iter().map(|op| format!("{op}\n")).collect(),
            FlateBody::Objects(group) => group.contents_text(),
            FlateBody::Bytes(bytes) => bytes_as_text(bytes),
        }
    }
}

/// Stream whose contents are computed once from its body, deflated when
/// `encode` is set, and cached until the body changes.
///
/// An encrypted flate stream is sealed: its contents are fixed ciphertext
/// and its body can no longer be modified.
#[derive(Debug, Clone)]
pub struct FlateStream {
    dict: Dictionary,
    encode: bool,
    body: FlateBody,
    contents: Cache<Vec<u8>>,
    sealed: Option<Vec<u8>>,
}

impl FlateStream {
    pub(crate) fn new(mut dict: Dictionary, body: FlateBody, encode: bool) -> Self {
        if encode {
            dict.set("Filter", Object::name("FlateDecode"));
        }
        Self {
            dict,
            encode,
            body,
            contents: Cache::new(),
            sealed: None,
        }
    }

    pub fn for_content(dict: Dictionary, operators: Vec<Operator>, encode: bool) -> Self {
        Self::new(dict, FlateBody::Content(operators), encode)
    }

    pub fn for_bytes(dict: Dictionary, payload: Vec<u8>, encode: bool) -> Self {
        Self::new(dict, FlateBody::Bytes(payload), encode)
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dict
    }

    pub fn body(&self) -> &FlateBody {
        &self.body
    }

    pub fn encodes(&self) -> bool {
        self.encode
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.is_some()
    }

    /// Payload before compression and encryption.
    pub fn unencoded_contents(&self) -> Result<Vec<u8>> {
        self.body.unencoded_contents()
    }

    /// Payload as written: deflated if encoding, ciphertext if sealed.
    pub fn contents(&self) -> Result<&[u8]> {
        if let Some(sealed) = &self.sealed {
            return Ok(sealed);
        }
        let contents = self.contents.access(|| {
            let unencoded = self.body.unencoded_contents()?;
            if self.encode {
                compress(&unencoded)
            } else {
                Ok(unencoded)
            }
        })?;
        Ok(contents)
    }

    /// Debug rendering of the unencoded payload. A sealed stream only shows
    /// its ciphertext length.
    pub fn contents_text(&self) -> String {
        match &self.sealed {
            Some(ciphertext) => format!("<encrypted {} bytes>", ciphertext.len()),
            None => self.body.text(),
        }
    }

    /// Drop the cached contents so the next access recomputes them.
    pub fn invalidate(&mut self) {
        self.contents.invalidate();
    }

    pub fn push_operators(&mut self, operators: impl IntoIterator<Item = Operator>) -> Result<()> {
        self.ensure_unsealed()?;
        match &mut self.body {
            FlateBody::Content(existing) => existing.extend(operators),
            _ => {
                return Err(PdfError::InvalidStructure(
                    "operators can only be appended to a content stream".to_string(),
                ))
            }
        }
        self.invalidate();
        Ok(())
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) -> Result<()> {
        self.ensure_unsealed()?;
        match &mut self.body {
            FlateBody::Bytes(bytes) => *bytes = payload,
            _ => {
                return Err(PdfError::InvalidStructure(
                    "only byte streams accept a raw payload".to_string(),
                ))
            }
        }
        self.invalidate();
        Ok(())
    }

    fn ensure_unsealed(&self) -> Result<()> {
        if self.is_sealed() {
            return Err(PdfError::InvalidStructure(
                "stream contents are sealed by encryption".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of this stream whose contents are the encoded payload routed
    /// through `encrypter`.
    pub fn encrypt_with(&self, encrypter: &mut dyn ObjectEncrypter, id: ObjectId) -> Result<FlateStream> {
        let ciphertext = encrypter.encrypt_object_content(self.contents()?, id)?;
        let dict = self
            .dict
            .try_encrypt(encrypter, id)?
            .unwrap_or_else(|| self.dict.clone());
        Ok(FlateStream {
            dict,
            encode: self.encode,
            body: self.body.clone(),
            contents: Cache::new(),
            sealed: Some(ciphertext),
        })
    }
}

impl PartialEq for FlateStream {
    fn eq(&self, other: &Self) -> bool {
        self.dict == other.dict
            && self.encode == other.encode
            && self.body == other.body
            && self.sealed == other.sealed
    }
}
