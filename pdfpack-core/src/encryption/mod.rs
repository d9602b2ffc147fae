//! PDF encryption support according to ISO 32000-1 Chapter 7.6
//!
//! Documents are encrypted with the standard security handler, revision 4,
//! using AES-128 crypt filters for both strings and streams. RC4 only appears
//! inside the password derivation rounds.

mod aes;
mod encryption_dict;
mod object_encryption;
mod permissions;
mod rc4;
mod security;
mod standard_security;

pub use aes::{aes128_cbc_encrypt, FixedIv, IvSource, RandomIv, AES_BLOCK_SIZE};
pub use encryption_dict::{CryptFilter, EncryptionDictionary};
pub use object_encryption::{derive_object_key, EncryptionSession, ObjectEncrypter};
pub use permissions::Permissions;
pub use rc4::{rc4, Rc4};
pub use security::{PdfSecurity, SecurityOptions};
pub use standard_security::{
    pad_password, EncryptionKey, SecurityHandlerRevision, StandardSecurityHandler,
    PASSWORD_PADDING,
};
