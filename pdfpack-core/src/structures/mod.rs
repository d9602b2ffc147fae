//! Packed and unpacked document structures: flate streams, object streams,
//! cross-reference sections and the file header/trailer.

mod cross_ref_section;
mod cross_ref_stream;
mod flate_stream;
mod header;
mod object_stream;
mod operator;
mod trailer;

pub use cross_ref_section::CrossRefSection;
pub use cross_ref_stream::{CrossRefStream, XRefEntry};
pub use flate_stream::{FlateBody, FlateStream};
pub use header::PdfHeader;
pub use object_stream::ObjectStream;
pub use operator::Operator;
pub use trailer::{PdfTrailer, PdfTrailerDict};
