//! PDF writing functionality
//!
//! [`PdfWriter`] lays out every object of a [`crate::PdfContext`] either as a
//! classic file with an `xref` table, or compacted into object streams with a
//! cross-reference stream.

mod config;
mod pdf_writer;

pub use config::WriterConfig;
pub use pdf_writer::{PdfWriter, WriterPhase};
