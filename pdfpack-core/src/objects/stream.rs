use crate::encryption::ObjectEncrypter;
use crate::error::{PdfError, Result};
use crate::objects::syntax::{bytes_as_text, ByteCursor};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::structures::FlateStream;
use std::fmt;

/// Stream object: a dictionary followed by a byte payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Stream {
    /// Payload stored exactly as it will be written.
    Raw(RawStream),
    /// Payload produced from a body and optionally deflated.
    Flate(FlateStream),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawStream {
    dict: Dictionary,
    contents: Vec<u8>,
}

impl RawStream {
    pub fn new(dict: Dictionary, contents: Vec<u8>) -> Self {
        Self { dict, contents }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dict
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

/// Length of `"\nstream\n"` plus `"\nendstream"`.
const STREAM_KEYWORDS_SIZE: usize = 18;

impl Stream {
    pub fn dictionary(&self) -> &Dictionary {
        match self {
            Stream::Raw(raw) => &raw.dict,
            Stream::Flate(flate) => flate.dictionary(),
        }
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        match self {
            Stream::Raw(raw) => &mut raw.dict,
            Stream::Flate(flate) => flate.dictionary_mut(),
        }
    }

    /// Bytes written between `stream` and `endstream`.
    pub fn contents(&self) -> Result<&[u8]> {
        match self {
            Stream::Raw(raw) => Ok(&raw.contents),
            Stream::Flate(flate) => flate.contents(),
        }
    }

    /// The dictionary as written, with `Length` matching the contents.
    pub fn encoded_dictionary(&self) -> Result<Dictionary> {
        let mut dict = self.dictionary().clone();
        dict.set("Length", self.contents()?.len());
        Ok(dict)
    }

    pub fn size_in_bytes(&self) -> Result<usize> {
        Ok(self.encoded_dictionary()?.size_in_bytes()?
            + self.contents()?.len()
            + STREAM_KEYWORDS_SIZE)
    }

    pub(crate) fn emit(&self, out: &mut ByteCursor<'_>) -> Result<()> {
        self.encoded_dictionary()?.emit(out)?;
        out.put(b"\nstream\n")?;
        out.put(self.contents()?)?;
        out.put(b"\nendstream")
    }

    /// Encrypt the payload for `id`. Strings in the dictionary are
    /// encrypted as well.
    pub fn encrypt_with(&self, encrypter: &mut dyn ObjectEncrypter, id: ObjectId) -> Result<Stream> {
        match self {
            Stream::Raw(raw) => {
                let contents = encrypter.encrypt_object_content(&raw.contents, id)?;
                let dict = raw
                    .dict
                    .try_encrypt(encrypter, id)?
                    .unwrap_or_else(|| raw.dict.clone());
                Ok(Stream::Raw(RawStream::new(dict, contents)))
            }
            Stream::Flate(flate) => Ok(Stream::Flate(flate.encrypt_with(encrypter, id)?)),
        }
    }

    fn contents_text(&self) -> String {
        match self {
            Stream::Raw(raw) => bytes_as_text(&raw.contents),
            Stream::Flate(flate) => flate.contents_text(),
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dict = self.encoded_dictionary().map_err(|_| fmt::Error)?;
        write!(f, "{dict}\nstream\n{}\nendstream", self.contents_text())
    }
}

impl TryFrom<Object> for Stream {
    type Error = PdfError;

    fn try_from(object: Object) -> Result<Self> {
        match object {
            Object::Stream(stream) => Ok(stream),
            other => Err(PdfError::InvalidStructure(format!(
                "expected a stream, found {other}"
            ))),
        }
    }
}
