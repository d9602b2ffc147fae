use crate::context::PdfContext;
use crate::encryption::EncryptionSession;
use crate::error::{PdfError, Result};
use crate::objects::syntax::ByteCursor;
use crate::objects::{Object, ObjectId};
use crate::structures::{
    CrossRefSection, CrossRefStream, ObjectStream, PdfHeader, PdfTrailer, PdfTrailerDict,
};
use crate::writer::WriterConfig;
use std::borrow::Cow;
use std::io::Write;
use tracing::{debug, trace};

const INDIRECT_OBJECT_END: &[u8] = b"\nendobj\n\n";

/// Where a writer is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterPhase {
    /// Walking the objects, encrypting them and recording offsets.
    Sizing,
    /// Copying the sized objects into the output buffer.
    Emitting,
    Done,
}

/// An indirect object placed at the top level of the file.
struct PlacedObject<'a> {
    id: ObjectId,
    object: Cow<'a, Object>,
    size: usize,
}

enum CrossReference {
    Table {
        section: CrossRefSection,
        trailer_dict: PdfTrailerDict,
    },
    /// Already among the placed objects.
    Stream,
}

struct Layout<'a> {
    size: usize,
    header: PdfHeader,
    objects: Vec<PlacedObject<'a>>,
    cross_reference: CrossReference,
    trailer: PdfTrailer,
}

/// Serializes every object of a [`PdfContext`] in two passes: the first
/// computes the exact size and offset of everything, the second copies the
/// bytes into a buffer of exactly that size.
pub struct PdfWriter<'a> {
    context: &'a PdfContext,
    config: WriterConfig,
    phase: WriterPhase,
    parsed_objects: usize,
    session: Option<EncryptionSession>,
}

impl<'a> PdfWriter<'a> {
    pub fn for_context(context: &'a PdfContext, config: WriterConfig) -> Self {
        Self {
            context,
            config,
            phase: WriterPhase::Sizing,
            parsed_objects: 0,
            session: context.security().map(|security| security.session()),
        }
    }

    /// Replace the session created from the document's security settings,
    /// e.g. with one using a fixed IV source.
    pub fn with_encryption_session(mut self, session: EncryptionSession) -> Result<Self> {
        if !self.context.is_encrypting() {
            return Err(PdfError::EncryptionError(
                "document has no encryption dictionary".to_string(),
            ));
        }
        self.session = Some(session);
        Ok(self)
    }

    pub fn phase(&self) -> WriterPhase {
        self.phase
    }

    /// Serialize the whole document. A writer can only be run once.
    pub async fn serialize_to_buffer(&mut self) -> Result<Vec<u8>> {
        if self.phase != WriterPhase::Sizing || self.parsed_objects > 0 {
            return Err(PdfError::InvalidStructure(
                "writer has already been run".to_string(),
            ));
        }

        debug!(
            objects = self.context.object_count(),
            compacted = self.config.use_object_streams,
            encrypted = self.session.is_some(),
            "sizing document"
        );
        let layout = if self.config.use_object_streams {
            self.compute_compacted_layout().await?
        } else {
            self.compute_classic_layout().await?
        };

        self.phase = WriterPhase::Emitting;
        debug!(size = layout.size, objects = layout.objects.len(), "emitting document");
        let buffer = Self::emit(&layout)?;

        self.session = None;
        self.phase = WriterPhase::Done;
        Ok(buffer)
    }

    /// Serialize and write the result to `writer`, returning the byte count.
    pub async fn serialize_to_writer<W: Write>(&mut self, writer: &mut W) -> Result<usize> {
        let buffer = self.serialize_to_buffer().await?;
        writer.write_all(&buffer)?;
        writer.flush()?;
        Ok(buffer.len())
    }

    /// Count processed objects and yield to the scheduler at every
    /// `objects_per_tick` boundary.
    async fn tick(&mut self, processed: usize) {
        self.parsed_objects += processed;
        if self.parsed_objects % self.config.objects_per_tick.max(1) == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// The encrypted form of `object`, if the document is encrypted and
    /// anything in it changes. The encryption dictionary is left alone.
    fn encrypt_if_possible(&mut self, id: ObjectId, object: &Object) -> Result<Option<Object>> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        if Some(id) == self.context.trailer_info().encrypt {
            return Ok(None);
        }
        object.try_encrypt(session, id)
    }

    async fn compute_classic_layout(&mut self) -> Result<Layout<'a>> {
        let context = self.context;
        let header = PdfHeader::for_version(1, 7);
        let mut size = header.size_in_bytes() + 2;

        let mut section = CrossRefSection::create();
        let mut objects = Vec::with_capacity(context.object_count());

        for (id, object) in context.enumerate_indirect_objects() {
            let object = match self.encrypt_if_possible(id, object)? {
                Some(encrypted) => Cow::Owned(encrypted),
                None => Cow::Borrowed(object),
            };
            section.add_entry(id, size);
            let object_size = indirect_object_size(id, &object)?;
            size += object_size;
            objects.push(PlacedObject {
                id,
                object,
                size: object_size,
            });
            self.tick(1).await;
        }

        let xref_offset = size;
        size += section.size_in_bytes() + 1;

        let trailer_dict = PdfTrailerDict::of(context.create_trailer_dict());
        size += trailer_dict.size_in_bytes()? + 2;

        let trailer = PdfTrailer::for_last_cross_ref_section_offset(xref_offset);
        size += trailer.size_in_bytes();

        Ok(Layout {
            size,
            header,
            objects,
            cross_reference: CrossReference::Table {
                section,
                trailer_dict,
            },
            trailer,
        })
    }

    async fn compute_compacted_layout(&mut self) -> Result<Layout<'a>> {
        let context = self.context;
        let encode = self.config.compress_streams;
        let objects_per_stream = self.config.objects_per_stream.max(1);

        let mut object_number = context.largest_object_number() + 1;
        let header = PdfHeader::for_version(1, 7);
        let mut size = header.size_in_bytes() + 2;

        let mut xref = CrossRefStream::create(context.create_trailer_dict(), encode);
        let mut objects = Vec::new();
        let mut groups: Vec<(ObjectId, Vec<(ObjectId, Object)>)> = Vec::new();

        for (id, object) in context.enumerate_indirect_objects() {
            if ObjectStream::should_not_store(id, object, context) {
                let object = match self.encrypt_if_possible(id, object)? {
                    Some(encrypted) => Cow::Owned(encrypted),
                    None => Cow::Borrowed(object),
                };
                xref.add_uncompressed_entry(id, size);
                let object_size = indirect_object_size(id, &object)?;
                size += object_size;
                objects.push(PlacedObject {
                    id,
                    object,
                    size: object_size,
                });
                self.tick(1).await;
                continue;
            }

            // Members are not encrypted on their own; the whole group is.
            let needs_group = groups
                .last()
                .map_or(true, |(_, members)| members.len() >= objects_per_stream);
            if needs_group {
                groups.push((ObjectId::of(object_number), Vec::new()));
                object_number += 1;
            }
            if let Some((group_id, members)) = groups.last_mut() {
                xref.add_compressed_entry(id, *group_id, members.len());
                members.push((id, object.clone()));
            }
        }

        for (group_id, members) in groups {
            let count = members.len();
            let stream = Object::from(ObjectStream::with_objects(members, encode)?);
            let object = match self.encrypt_if_possible(group_id, &stream)? {
                Some(encrypted) => encrypted,
                None => stream,
            };

            xref.add_uncompressed_entry(group_id, size);
            let object_size = indirect_object_size(group_id, &object)?;
            size += object_size;
            trace!(group = %group_id, members = count, offset = size - object_size, "placed object stream");

            objects.push(PlacedObject {
                id: group_id,
                object: Cow::Owned(object),
                size: object_size,
            });
            self.tick(count).await;
        }

        let xref_id = ObjectId::of(object_number);
        object_number += 1;
        xref.dictionary_mut().set("Size", object_number);
        xref.add_uncompressed_entry(xref_id, size);
        let xref_offset = size;

        let xref_object = xref.to_object()?;
        let xref_size = indirect_object_size(xref_id, &xref_object)?;
        size += xref_size;
        objects.push(PlacedObject {
            id: xref_id,
            object: Cow::Owned(xref_object),
            size: xref_size,
        });

        let trailer = PdfTrailer::for_last_cross_ref_section_offset(xref_offset);
        size += trailer.size_in_bytes();

        Ok(Layout {
            size,
            header,
            objects,
            cross_reference: CrossReference::Stream,
            trailer,
        })
    }

    fn emit(layout: &Layout<'_>) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; layout.size];
        let mut offset = layout.header.copy_bytes_into(&mut buffer, 0)?;
        offset += put(&mut buffer, offset, b"\n\n")?;

        for placed in &layout.objects {
            let start = offset;
            offset += put(&mut buffer, offset, object_start(placed.id).as_bytes())?;
            offset += placed.object.copy_bytes_into(&mut buffer, offset)?;
            offset += put(&mut buffer, offset, INDIRECT_OBJECT_END)?;
            check_size(&placed.id.to_string(), placed.size, offset - start)?;
        }

        if let CrossReference::Table {
            section,
            trailer_dict,
        } = &layout.cross_reference
        {
            offset += section.copy_bytes_into(&mut buffer, offset)?;
            offset += put(&mut buffer, offset, b"\n")?;
            offset += trailer_dict.copy_bytes_into(&mut buffer, offset)?;
            offset += put(&mut buffer, offset, b"\n\n")?;
        }

        offset += layout.trailer.copy_bytes_into(&mut buffer, offset)?;
        check_size("document", layout.size, offset)?;
        Ok(buffer)
    }
}

fn object_start(id: ObjectId) -> String {
    format!("{} {} obj\n", id.number(), id.generation())
}

fn indirect_object_size(id: ObjectId, object: &Object) -> Result<usize> {
    Ok(object_start(id).len() + object.size_in_bytes()? + INDIRECT_OBJECT_END.len())
}

fn put(buffer: &mut [u8], offset: usize, bytes: &[u8]) -> Result<usize> {
    let mut out = ByteCursor::new(buffer, offset);
    out.put(bytes)?;
    Ok(out.written())
}

fn check_size(context: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(PdfError::SizeMismatch {
            context: context.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
