//! Per-object payload encryption for the writer (ISO 32000-1 section 7.6.2,
//! algorithm 1 with the AES extension)

use crate::encryption::aes::{aes128_cbc_encrypt, IvSource, RandomIv, AES_BLOCK_SIZE};
use crate::encryption::EncryptionKey;
use crate::error::Result;
use crate::objects::ObjectId;
use std::collections::HashMap;
use tracing::trace;

/// Salt appended to the object key material for AES.
const AES_SALT: &[u8; 4] = b"sAlT";

/// Anything that can encrypt a string or stream payload on behalf of one
/// indirect object.
pub trait ObjectEncrypter {
    fn encrypt_object_content(&mut self, data: &[u8], id: ObjectId) -> Result<Vec<u8>>;
}

/// Key for one indirect object: the document key extended with the low three
/// bytes of the object number and the low two bytes of the generation (both
/// least significant first) and the AES salt, hashed and truncated.
pub fn derive_object_key(key: &EncryptionKey, id: ObjectId) -> Vec<u8> {
    let number = id.number().to_le_bytes();
    let generation = id.generation().to_le_bytes();

    let mut data = Vec::with_capacity(key.len() + 9);
    data.extend_from_slice(key.as_bytes());
    data.extend_from_slice(&number[..3]);
    data.extend_from_slice(&generation);
    data.extend_from_slice(AES_SALT);

    let mut digest = md5::compute(&data).to_vec();
    digest.truncate((key.len() + 5).min(16));
    digest
}

/// Encryption state for a single write.
///
/// Object keys are computed once per reference and kept until the session is
/// dropped.
pub struct EncryptionSession {
    key: EncryptionKey,
    object_keys: HashMap<ObjectId, Vec<u8>>,
    iv_source: Box<dyn IvSource + Send>,
}

impl EncryptionSession {
    pub fn new(key: EncryptionKey) -> Self {
        Self::with_iv_source(key, RandomIv)
    }

    pub fn with_iv_source(key: EncryptionKey, iv_source: impl IvSource + Send + 'static) -> Self {
        Self {
            key,
            object_keys: HashMap::new(),
            iv_source: Box::new(iv_source),
        }
    }

    pub fn key(&self) -> &EncryptionKey {
        &self.key
    }

    pub fn object_key(&mut self, id: ObjectId) -> &[u8] {
        let key = &self.key;
        self.object_keys
            .entry(id)
            .or_insert_with(|| derive_object_key(key, id))
    }

    pub fn cached_key_count(&self) -> usize {
        self.object_keys.len()
    }
}

impl ObjectEncrypter for EncryptionSession {
    /// `IV || AES-128-CBC(data)` under the key of `id`.
    fn encrypt_object_content(&mut self, data: &[u8], id: ObjectId) -> Result<Vec<u8>> {
        let iv = self.iv_source.next_iv();
        let key = self.object_key(id).to_vec();
        let ciphertext = aes128_cbc_encrypt(&key, &iv, data)?;

        trace!(object = %id, plain = data.len(), encrypted = ciphertext.len() + AES_BLOCK_SIZE, "encrypted payload");

        let mut output = Vec::with_capacity(AES_BLOCK_SIZE + ciphertext.len());
        output.extend_from_slice(&iv);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }
}

impl std::fmt::Debug for EncryptionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionSession")
            .field("key_length", &self.key.len())
            .field("cached_keys", &self.object_keys.len())
            .finish()
    }
}
