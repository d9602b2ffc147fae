use crate::encryption::ObjectEncrypter;
use crate::error::Result;
use crate::objects::syntax::{
    bytes_as_text, encode_literal, encode_name, format_real, literal_size, text_string_bytes,
    ByteCursor,
};
use crate::objects::{Dictionary, HexString, RawStream, Stream};
use crate::structures::FlateStream;
use std::fmt;

/// Indirect reference: object number plus generation number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    number: u32,
    generation: u16,
}

impl ObjectId {
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }

    /// Reference with generation 0.
    pub fn of(number: u32) -> Self {
        Self::new(number, 0)
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    /// Canonical `"n g R"` form.
    pub fn tag(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// Literal string bytes, written as `(...)`.
    String(Vec<u8>),
    HexString(HexString),
    Name(String),
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Reference(ObjectId),
    Stream(Stream),
    /// Bytes the library could not interpret, written back verbatim.
    Invalid(Vec<u8>),
}

impl Object {
    pub const NULL: Object = Object::Null;
    pub const TRUE: Object = Object::Boolean(true);
    pub const FALSE: Object = Object::Boolean(false);

    pub fn name(name: impl Into<String>) -> Self {
        Object::Name(name.into())
    }

    /// Literal string holding `text` as a PDF text string: one byte per
    /// char when every char is at most U+00FF, UTF-16BE with a byte order
    /// mark otherwise.
    pub fn string(text: impl AsRef<str>) -> Self {
        Object::String(text_string_bytes(text.as_ref()))
    }

    /// Literal string with the given bytes, unchanged.
    pub fn literal(bytes: impl Into<Vec<u8>>) -> Self {
        Object::String(bytes.into())
    }

    pub fn hex(value: impl Into<String>) -> Self {
        Object::HexString(HexString::of(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Object::Stream(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Object::Invalid(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(f) => Some(*f),
            Object::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_literal_bytes(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectId> {
        match self {
            Object::Reference(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Object::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    /// Exact number of bytes [`Object::copy_bytes_into`] will write.
    pub fn size_in_bytes(&self) -> Result<usize> {
        let size = match self {
            Object::Null => 4,
            Object::Boolean(true) => 4,
            Object::Boolean(false) => 5,
            Object::Integer(i) => i.to_string().len(),
            Object::Real(f) => format_real(*f).len(),
            Object::String(s) => literal_size(s),
            Object::HexString(hex) => hex.size_in_bytes(),
            Object::Name(n) => encode_name(n).len(),
            Object::Array(items) => {
                // "[ " + item + " " ... + "]"
                let mut size = 3;
                for item in items {
                    size += item.size_in_bytes()? + 1;
                }
                size
            }
            Object::Dictionary(dict) => dict.size_in_bytes()?,
            Object::Reference(id) => id.to_string().len(),
            Object::Stream(stream) => stream.size_in_bytes()?,
            Object::Invalid(bytes) => bytes.len(),
        };
        Ok(size)
    }

    /// Serialize into `buffer` starting at `offset`, returning the number of
    /// bytes written.
    pub fn copy_bytes_into(&self, buffer: &mut [u8], offset: usize) -> Result<usize> {
        let mut cursor = ByteCursor::new(buffer, offset);
        self.emit(&mut cursor)?;
        Ok(cursor.written())
    }

    /// Serialize into a freshly allocated vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; self.size_in_bytes()?];
        self.copy_bytes_into(&mut buffer, 0)?;
        Ok(buffer)
    }

    pub(crate) fn emit(&self, out: &mut ByteCursor<'_>) -> Result<()> {
        match self {
            Object::Null => out.put(b"null"),
            Object::Boolean(true) => out.put(b"true"),
            Object::Boolean(false) => out.put(b"false"),
            Object::Integer(i) => out.put_str(&i.to_string()),
            Object::Real(f) => out.put_str(&format_real(*f)),
            Object::String(s) => out.put(&encode_literal(s)),
            Object::HexString(hex) => hex.emit(out),
            Object::Name(n) => out.put_str(&encode_name(n)),
            Object::Array(items) => {
                out.put(b"[ ")?;
                for item in items {
                    item.emit(out)?;
                    out.put_byte(b' ')?;
                }
                out.put_byte(b']')
            }
            Object::Dictionary(dict) => dict.emit(out),
            Object::Reference(id) => out.put_str(&id.to_string()),
            Object::Stream(stream) => stream.emit(out),
            Object::Invalid(bytes) => out.put(bytes),
        }
    }

    /// Encrypt the payload of this object for the indirect object `id`.
    ///
    /// Literal and hex strings become hex strings holding ciphertext, streams
    /// get encrypted contents, and containers are rebuilt when a member
    /// changed. Returns `None` when nothing in the object is encryptable.
    pub fn try_encrypt(
        &self,
        encrypter: &mut dyn ObjectEncrypter,
        id: ObjectId,
    ) -> Result<Option<Object>> {
        match self {
            Object::String(s) => {
                let encrypted = encrypter.encrypt_object_content(s, id)?;
                Ok(Some(Object::HexString(HexString::from_bytes(&encrypted))))
            }
            Object::HexString(hex) => Ok(hex.encrypt_with(encrypter, id)?.map(Object::HexString)),
            Object::Stream(stream) => Ok(Some(Object::Stream(stream.encrypt_with(encrypter, id)?))),
            Object::Array(items) => {
                let mut changed = false;
                let mut encrypted = Vec::with_capacity(items.len());
                for item in items {
                    match item.try_encrypt(encrypter, id)? {
                        Some(replacement) => {
                            changed = true;
                            encrypted.push(replacement);
                        }
                        None => encrypted.push(item.clone()),
                    }
                }
                Ok(changed.then_some(Object::Array(encrypted)))
            }
            Object::Dictionary(dict) => Ok(dict.try_encrypt(encrypter, id)?.map(Object::Dictionary)),
            Object::Null
            | Object::Boolean(_)
            | Object::Integer(_)
            | Object::Real(_)
            | Object::Name(_)
            | Object::Reference(_)
            | Object::Invalid(_) => Ok(None),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => f.write_str("null"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::Integer(i) => write!(f, "{i}"),
            Object::Real(r) => f.write_str(&format_real(*r)),
            Object::String(s) => f.write_str(&bytes_as_text(&encode_literal(s))),
            Object::HexString(hex) => write!(f, "{hex}"),
            Object::Name(n) => f.write_str(&encode_name(n)),
            Object::Array(items) => {
                f.write_str("[ ")?;
                for item in items {
                    write!(f, "{item} ")?;
                }
                f.write_str("]")
            }
            Object::Dictionary(dict) => write!(f, "{dict}"),
            Object::Reference(id) => write!(f, "{id}"),
            Object::Stream(stream) => write!(f, "{stream}"),
            Object::Invalid(bytes) => f.write_str(&bytes_as_text(bytes)),
        }
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Boolean(b)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<u32> for Object {
    fn from(i: u32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<usize> for Object {
    fn from(i: usize) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<f64> for Object {
    fn from(f: f64) -> Self {
        Object::Real(f)
    }
}

impl From<Vec<Object>> for Object {
    fn from(v: Vec<Object>) -> Self {
        Object::Array(v)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Object::Dictionary(d)
    }
}

impl From<ObjectId> for Object {
    fn from(id: ObjectId) -> Self {
        Object::Reference(id)
    }
}

impl From<HexString> for Object {
    fn from(hex: HexString) -> Self {
        Object::HexString(hex)
    }
}

impl From<Stream> for Object {
    fn from(stream: Stream) -> Self {
        Object::Stream(stream)
    }
}

impl From<RawStream> for Object {
    fn from(stream: RawStream) -> Self {
        Object::Stream(Stream::Raw(stream))
    }
}

impl From<FlateStream> for Object {
    fn from(stream: FlateStream) -> Self {
        Object::Stream(Stream::Flate(stream))
    }
}
