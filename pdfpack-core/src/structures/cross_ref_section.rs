//! Classic cross-reference table (ISO 32000-1 section 7.5.4)

use crate::error::Result;
use crate::objects::syntax::ByteCursor;
use crate::objects::ObjectId;
use std::fmt;

/// Every line of the table is exactly this long, `\n` included.
const ENTRY_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    id: ObjectId,
    offset: usize,
    deleted: bool,
}

impl Entry {
    fn line(&self) -> String {
        format!(
            "{:010} {:05} {} \n",
            self.offset,
            self.id.generation(),
            if self.deleted { 'f' } else { 'n' }
        )
    }
}

/// Single `xref` section. The head of the free list, `0000000000 65535 f`,
/// is always present.
#[derive(Debug, Clone)]
pub struct CrossRefSection {
    entries: Vec<Entry>,
}

impl CrossRefSection {
    pub fn create() -> Self {
        Self {
            entries: vec![Entry {
                id: ObjectId::new(0, 65535),
                offset: 0,
                deleted: true,
            }],
        }
    }

    pub fn add_entry(&mut self, id: ObjectId, offset: usize) {
        self.entries.push(Entry {
            id,
            offset,
            deleted: false,
        });
    }

    /// Free entry; `next_free` is the number of the next free object.
    pub fn add_deleted_entry(&mut self, id: ObjectId, next_free: u32) {
        self.entries.push(Entry {
            id,
            offset: next_free as usize,
            deleted: true,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by object number, split into runs of consecutive
    /// numbers.
    fn subsections(&self) -> Vec<Vec<Entry>> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|entry| entry.id);

        let mut subsections: Vec<Vec<Entry>> = Vec::new();
        for entry in sorted {
            let extends_run = subsections
                .last()
                .and_then(|run| run.last())
                .is_some_and(|prev| prev.id.number() + 1 == entry.id.number());
            match subsections.last_mut() {
                Some(run) if extends_run => run.push(entry),
                _ => subsections.push(vec![entry]),
            }
        }
        subsections
    }

    fn subsection_header(run: &[Entry]) -> String {
        let first = run.first().map(|entry| entry.id.number()).unwrap_or(0);
        format!("{} {}\n", first, run.len())
    }

    pub fn size_in_bytes(&self) -> usize {
        let mut size = "xref\n".len();
        for run in self.subsections() {
            size += Self::subsection_header(&run).len() + ENTRY_SIZE * run.len();
        }
        size
    }

    pub fn copy_bytes_into(&self, buffer: &mut [u8], offset: usize) -> Result<usize> {
        let mut out = ByteCursor::new(buffer, offset);
        out.put(b"xref\n")?;
        for run in self.subsections() {
            out.put_str(&Self::subsection_header(&run))?;
            for entry in &run {
                out.put_str(&entry.line())?;
            }
        }
        Ok(out.written())
    }
}

impl fmt::Display for CrossRefSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("xref\n")?;
        for run in self.subsections() {
            f.write_str(&Self::subsection_header(&run))?;
            for entry in &run {
                f.write_str(&entry.line())?;
            }
        }
        Ok(())
    }
}
