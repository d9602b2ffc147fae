//! PDF encryption dictionary structures

use crate::encryption::{Permissions, SecurityHandlerRevision};
use crate::objects::{Dictionary, HexString, Object};

/// The `StdCF` crypt filter: AES-128 in CBC mode (`/CFM /AESV2`), used for
/// both strings and streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptFilter {
    pub name: String,
    /// Key length in bytes
    pub length: u32,
}

impl CryptFilter {
    pub fn aes_v2(key_length: u32) -> Self {
        Self {
            name: "StdCF".to_string(),
            length: key_length,
        }
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("CFM", Object::name("AESV2"));
        dict.set("Length", self.length);
        dict
    }
}

/// The `Encrypt` entry of the trailer for the standard security handler,
/// algorithm version 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionDictionary {
    /// Algorithm version
    pub v: u32,
    /// Key length in bits
    pub length: u32,
    pub crypt_filter: CryptFilter,
    pub revision: SecurityHandlerRevision,
    /// Owner password entry
    pub o: Vec<u8>,
    /// User password entry
    pub u: Vec<u8>,
    pub permissions: Permissions,
}

impl EncryptionDictionary {
    pub fn aes_128(
        revision: SecurityHandlerRevision,
        o: Vec<u8>,
        u: Vec<u8>,
        permissions: Permissions,
    ) -> Self {
        Self {
            v: 4,
            length: 128,
            crypt_filter: CryptFilter::aes_v2(16),
            revision,
            o,
            u,
            permissions,
        }
    }

    /// Convert to PDF dictionary. `O` and `U` are never encrypted
    /// themselves.
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Filter", Object::name("Standard"));
        dict.set("V", self.v);

        let mut filters = Dictionary::new();
        filters.set(self.crypt_filter.name.clone(), self.crypt_filter.to_dict());
        dict.set("CF", filters);
        dict.set("StmF", Object::name(self.crypt_filter.name.clone()));
        dict.set("StrF", Object::name(self.crypt_filter.name.clone()));

        dict.set("Length", self.length);
        dict.set("R", self.revision.number());
        dict.set("O", HexString::from_bytes(&self.o).preventing_encryption());
        dict.set("U", HexString::from_bytes(&self.u).preventing_encryption());
        dict.set("P", self.permissions.p_value() as i64);
        dict
    }
}
