mod dictionary;
mod primitive;
mod stream;
mod string;
pub(crate) mod syntax;

pub use dictionary::Dictionary;
pub use primitive::{Object, ObjectId};
pub use stream::{RawStream, Stream};
pub use string::HexString;
