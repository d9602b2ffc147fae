//! # pdfpack
//!
//! PDF object model and serializer with object-stream packing and AES-128
//! encryption.
//!
//! ## Features
//!
//! - **Object model**: every PDF object kind with its exact byte encoding
//! - **Registry**: numbered indirect objects, trailer entries and unique names
//! - **Compacted output**: object streams plus a cross-reference stream
//! - **Classic output**: flat objects with an `xref` table and trailer
//! - **Encryption**: standard security handler revision 4 with AES-128
//!
//! ## Quick Start
//!
//! ```rust
//! use pdfpack::objects::{Dictionary, Object};
//! use pdfpack::{PdfContext, PdfWriter, Result, WriterConfig};
//!
//! # fn main() -> Result<()> {
//! let mut context = PdfContext::new();
//!
//! let mut pages = Dictionary::new();
//! pages.set("Type", Object::name("Pages"));
//! pages.set("Kids", Vec::<Object>::new());
//! pages.set("Count", 0);
//! let pages_id = context.register(pages);
//!
//! let mut catalog = Dictionary::new();
//! catalog.set("Type", Object::name("Catalog"));
//! catalog.set("Pages", pages_id);
//! let catalog_id = context.register(catalog);
//! context.trailer_info_mut().root = Some(catalog_id);
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build()?;
//! let bytes = runtime.block_on(async {
//!     PdfWriter::for_context(&context, WriterConfig::default())
//!         .serialize_to_buffer()
//!         .await
//! })?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! assert!(bytes.ends_with(b"%%EOF"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Encrypting
//!
//! ```rust
//! use pdfpack::encryption::SecurityOptions;
//! use pdfpack::objects::{Dictionary, Object};
//! use pdfpack::{PdfContext, Result};
//!
//! # fn main() -> Result<()> {
//! let mut context = PdfContext::new();
//! let root = context.register(Dictionary::new());
//! context.trailer_info_mut().root = Some(root);
//!
//! context.encrypt(&SecurityOptions::new("owner secret"))?;
//! assert!(context.trailer_info().encrypt.is_some());
//! # Ok(())
//! # }
//! ```

mod cache;
pub mod compression;
pub mod context;
pub mod encryption;
pub mod error;
pub mod objects;
pub mod structures;
pub mod writer;

pub use context::{PdfContext, TrailerInfo};
pub use error::{PdfError, Result};
pub use objects::{Dictionary, HexString, Object, ObjectId, RawStream, Stream};
pub use writer::{PdfWriter, WriterConfig, WriterPhase};

/// Current version of pdfpack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }
}
