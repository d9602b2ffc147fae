//! Object streams (ISO 32000-1 section 7.5.7)

use crate::context::PdfContext;
use crate::error::Result;
use crate::objects::syntax::ByteCursor;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::structures::{FlateBody, FlateStream};

/// Indirect objects packed into one stream.
///
/// The payload starts with `"<number> <offset> "` pairs, offsets counted
/// from the end of that header, followed by every object and a newline.
///
/// The only way to build one is [`ObjectStream::with_objects`]:
///
/// ```compile_fail
/// use pdfpack::structures::ObjectStream;
///
/// let group = ObjectStream {
///     objects: Vec::new(),
///     offsets: Vec::new(),
///     header: String::new(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStream {
    objects: Vec<(ObjectId, Object)>,
    offsets: Vec<(u32, usize)>,
    header: String,
}

impl ObjectStream {
    /// Whether an indirect object must be written outside of any object
    /// stream.
    ///
    /// Objects with a non-zero generation, streams, and unparsed
    /// placeholders never go into a group. Once the document has an
    /// encryption dictionary, neither it nor the catalog may be grouped.
    pub fn should_not_store(id: ObjectId, object: &Object, context: &PdfContext) -> bool {
        let trailer = context.trailer_info();
        if trailer.encrypt.is_some() && (Some(id) == trailer.encrypt || Some(id) == trailer.root)
        {
            return true;
        }
        id.generation() != 0 || object.is_stream() || object.is_invalid()
    }

    /// Build the flate stream holding `objects`, in the given order.
    pub fn with_objects(objects: Vec<(ObjectId, Object)>, encode: bool) -> Result<FlateStream> {
        let group = Self::layout(objects)?;
        let count = group.objects.len();
        let first = group.header.len();

        let mut stream = FlateStream::new(Dictionary::new(), FlateBody::Objects(group), encode);
        let dict = stream.dictionary_mut();
        dict.set("Type", Object::name("ObjStm"));
        dict.set("N", count);
        dict.set("First", first);
        Ok(stream)
    }

    fn layout(objects: Vec<(ObjectId, Object)>) -> Result<Self> {
        let mut offsets = Vec::with_capacity(objects.len());
        let mut header = String::new();
        let mut offset = 0;
        for (id, object) in &objects {
            offsets.push((id.number(), offset));
            header.push_str(&format!("{} {} ", id.number(), offset));
            offset += object.size_in_bytes()? + 1;
        }
        Ok(Self {
            objects,
            offsets,
            header,
        })
    }

    pub fn objects(&self) -> &[(ObjectId, Object)] {
        &self.objects
    }

    /// `(object number, offset)` for each member.
    pub fn offsets(&self) -> &[(u32, usize)] {
        &self.offsets
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn unencoded_contents(&self) -> Result<Vec<u8>> {
        let mut size = self.header.len();
        for (_, object) in &self.objects {
            size += object.size_in_bytes()? + 1;
        }
        let mut buffer = vec![0u8; size];
        let mut out = ByteCursor::new(&mut buffer, 0);
        out.put_str(&self.header)?;
        for (_, object) in &self.objects {
            object.emit(&mut out)?;
            out.put_byte(b'\n')?;
        }
        Ok(buffer)
    }

    pub(crate) fn contents_text(&self) -> String {
        let mut text = self.header.clone();
        for (_, object) in &self.objects {
            text.push_str(&object.to_string());
            text.push('\n');
        }
        text
    }
}
