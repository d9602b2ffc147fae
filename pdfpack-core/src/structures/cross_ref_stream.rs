//! Cross-reference streams (ISO 32000-1 section 7.5.8)

use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::structures::FlateStream;

/// One row of a cross-reference stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XRefEntry {
    /// Type 0
    Free { next_free: u32, generation: u16 },
    /// Type 1
    InUse { offset: u64, generation: u16 },
    /// Type 2
    Compressed { stream_number: u32, index: u32 },
}

impl XRefEntry {
    fn fields(&self) -> [u64; 3] {
        match *self {
            XRefEntry::Free {
                next_free,
                generation,
            } => [0, next_free as u64, generation as u64],
            XRefEntry::InUse { offset, generation } => [1, offset, generation as u64],
            XRefEntry::Compressed {
                stream_number,
                index,
            } => [2, stream_number as u64, index as u64],
        }
    }
}

/// Builder for the cross-reference stream that replaces both the `xref`
/// table and the trailer in compacted output.
#[derive(Debug, Clone)]
pub struct CrossRefStream {
    dict: Dictionary,
    encode: bool,
    entries: Vec<(u32, XRefEntry)>,
}

impl CrossRefStream {
    /// `dict` carries the trailer entries (`Size`, `Root`, `Encrypt`, `Info`,
    /// `ID`).
    pub fn create(mut dict: Dictionary, encode: bool) -> Self {
        dict.set("Type", Object::name("XRef"));
        Self {
            dict,
            encode,
            entries: vec![(
                0,
                XRefEntry::Free {
                    next_free: 0,
                    generation: 65535,
                },
            )],
        }
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dict
    }

    pub fn add_uncompressed_entry(&mut self, id: ObjectId, offset: usize) {
        self.entries.push((
            id.number(),
            XRefEntry::InUse {
                offset: offset as u64,
                generation: id.generation(),
            },
        ));
    }

    pub fn add_compressed_entry(&mut self, id: ObjectId, stream_id: ObjectId, index: usize) {
        self.entries.push((
            id.number(),
            XRefEntry::Compressed {
                stream_number: stream_id.number(),
                index: index as u32,
            },
        ));
    }

    pub fn entries(&self) -> impl Iterator<Item = &(u32, XRefEntry)> {
        self.entries.iter()
    }

    fn sorted_entries(&self) -> Vec<(u32, XRefEntry)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|(number, _)| *number);
        sorted
    }

    /// Calculate minimum bytes needed to represent a value
    fn bytes_needed(value: u64) -> usize {
        if value == 0 {
            1
        } else {
            ((value.ilog2() / 8) + 1) as usize
        }
    }

    /// Field widths for the `W` entry: type byte, then the widest second and
    /// third fields.
    pub fn widths(&self) -> [usize; 3] {
        let mut widths = [1, 1, 1];
        for (_, entry) in &self.entries {
            let [_, second, third] = entry.fields();
            widths[1] = widths[1].max(Self::bytes_needed(second));
            widths[2] = widths[2].max(Self::bytes_needed(third));
        }
        widths
    }

    /// `Index` pairs `[first count]` for each run of consecutive numbers.
    pub fn index(&self) -> Vec<(u32, u32)> {
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for (number, _) in self.sorted_entries() {
            match runs.last_mut() {
                Some((first, count)) if *first + *count == number => *count += 1,
                _ => runs.push((number, 1)),
            }
        }
        runs
    }

    /// Encode entries into binary data
    pub fn encode_entries(&self) -> Vec<u8> {
        let widths = self.widths();
        let mut data = Vec::with_capacity(self.entries.len() * widths.iter().sum::<usize>());
        for (_, entry) in self.sorted_entries() {
            for (value, width) in entry.fields().into_iter().zip(widths) {
                Self::write_field(&mut data, value, width);
            }
        }
        data
    }

    /// Write a field with the specified width
    fn write_field(data: &mut Vec<u8>, value: u64, width: usize) {
        for i in (0..width).rev() {
            data.push(((value >> (i * 8)) & 0xFF) as u8);
        }
    }

    /// The stream object to write, built from the entries added so far.
    pub fn to_stream(&self) -> Result<FlateStream> {
        let mut dict = self.dict.clone();
        let widths = self.widths();
        dict.set(
            "W",
            widths
                .iter()
                .map(|w| Object::from(*w))
                .collect::<Vec<_>>(),
        );
        let mut index = Vec::new();
        for (first, count) in self.index() {
            index.push(Object::from(first));
            index.push(Object::from(count));
        }
        dict.set("Index", index);
        Ok(FlateStream::for_bytes(dict, self.encode_entries(), self.encode))
    }

    pub fn to_object(&self) -> Result<Object> {
        Ok(Object::from(self.to_stream()?))
    }
}
