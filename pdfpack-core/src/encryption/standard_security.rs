//! Standard Security Handler implementation according to ISO 32000-1

use crate::encryption::rc4::rc4;
use crate::error::{PdfError, Result};

/// Padding used in password processing
pub const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Number of MD5 rounds applied to the owner password and the document key.
const HASH_ROUNDS: usize = 51;

/// Number of RC4 passes for the O and U entries.
const RC4_ROUNDS: u8 = 20;

/// Document encryption key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionKey {
    key: Vec<u8>,
}

impl EncryptionKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Get key length in bytes
    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

/// Security handler revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SecurityHandlerRevision {
    /// Revision 4 (AES-128 through crypt filters)
    #[default]
    R4 = 4,
    /// Revision 5 (AES-256). Recognised but not implemented.
    R5 = 5,
}

impl SecurityHandlerRevision {
    pub fn from_number(revision: u32) -> Result<Self> {
        match revision {
            4 => Ok(Self::R4),
            5 => Ok(Self::R5),
            other => Err(PdfError::UnsupportedSecurityHandler(other)),
        }
    }

    pub fn number(self) -> u32 {
        self as u32
    }
}

/// Pad or truncate a password to 32 bytes.
///
/// Only characters up to U+00FF can be represented; anything else is
/// rejected before any key material is derived.
pub fn pad_password(password: &str) -> Result<[u8; 32]> {
    let mut bytes = Vec::with_capacity(32);
    for ch in password.chars() {
        let code = ch as u32;
        if code > 0xFF {
            return Err(PdfError::InvalidPassword(format!(
                "character {ch:?} cannot be used in a password"
            )));
        }
        bytes.push(code as u8);
    }

    let len = bytes.len().min(32);
    let mut padded = [0u8; 32];
    padded[..len].copy_from_slice(&bytes[..len]);
    padded[len..].copy_from_slice(&PASSWORD_PADDING[..32 - len]);
    Ok(padded)
}

/// Standard Security Handler
#[derive(Debug, Clone, Copy)]
pub struct StandardSecurityHandler {
    revision: SecurityHandlerRevision,
    /// Key length in bytes
    key_length: usize,
}

impl StandardSecurityHandler {
    /// Create handler for AES-128 encryption (Revision 4)
    pub fn aes_128_r4() -> Self {
        Self {
            revision: SecurityHandlerRevision::R4,
            key_length: 16,
        }
    }

    /// Handler for the given revision, if it is one this crate can write.
    pub fn for_revision(revision: SecurityHandlerRevision) -> Result<Self> {
        match revision {
            SecurityHandlerRevision::R4 => Ok(Self::aes_128_r4()),
            other => Err(PdfError::UnsupportedSecurityHandler(other.number())),
        }
    }

    pub fn revision(&self) -> SecurityHandlerRevision {
        self.revision
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    /// Key length in bits, as written to `Length`.
    pub fn key_bits(&self) -> usize {
        self.key_length * 8
    }

    /// `data` encrypted `RC4_ROUNDS` times; pass `i` uses every key byte
    /// XOR `i`.
    fn rc4_rounds(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        let mut result = data.to_vec();
        for i in 0..RC4_ROUNDS {
            let round_key: Vec<u8> = key.iter().map(|byte| byte ^ i).collect();
            result = rc4(&round_key, &result)?;
        }
        Ok(result)
    }

    /// Compute owner password hash (O entry)
    pub fn compute_owner_entry(
        &self,
        owner_padded: &[u8; 32],
        user_padded: &[u8; 32],
    ) -> Result<Vec<u8>> {
        let mut digest = owner_padded.to_vec();
        for _ in 0..HASH_ROUNDS {
            digest = md5::compute(&digest).to_vec();
        }
        Self::rc4_rounds(&digest[..self.key_length], user_padded)
    }

    /// Compute encryption key from user password
    pub fn compute_encryption_key(
        &self,
        user_padded: &[u8; 32],
        owner_entry: &[u8],
        permissions: i32,
        first_id: &[u8],
    ) -> EncryptionKey {
        let mut data = Vec::with_capacity(32 + owner_entry.len() + 4 + first_id.len());
        data.extend_from_slice(user_padded);
        data.extend_from_slice(owner_entry);
        data.extend_from_slice(&permissions.to_le_bytes());
        data.extend_from_slice(first_id);

        for _ in 0..HASH_ROUNDS {
            data = md5::compute(&data).to_vec();
            data.truncate(self.key_length);
        }
        EncryptionKey::new(data)
    }

    /// Compute user password hash (U entry). Fails on an empty key.
    pub fn compute_user_entry(&self, key: &EncryptionKey, first_id: &[u8]) -> Result<Vec<u8>> {
        let mut data = PASSWORD_PADDING.to_vec();
        data.extend_from_slice(first_id);
        let hash = md5::compute(&data);

        let mut result = Self::rc4_rounds(key.as_bytes(), &hash.0)?;
        result.truncate(16);
        result.extend_from_slice(&PASSWORD_PADDING[..16]);
        Ok(result)
    }
}
