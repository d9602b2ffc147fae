//! AES-128 in CBC mode with PKCS#7 padding

use crate::error::{PdfError, Result};
use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use aes::Aes128;
use rand::rngs::OsRng;
use rand::RngCore;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

pub const AES_BLOCK_SIZE: usize = 16;

/// Source of initialization vectors for payload encryption.
pub trait IvSource {
    fn next_iv(&mut self) -> [u8; AES_BLOCK_SIZE];
}

/// Fresh random IVs from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIv;

impl IvSource for RandomIv {
    fn next_iv(&mut self) -> [u8; AES_BLOCK_SIZE] {
        let mut iv = [0u8; AES_BLOCK_SIZE];
        OsRng.fill_bytes(&mut iv);
        iv
    }
}

/// The same IV on every call. Only meant for reproducible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIv(pub [u8; AES_BLOCK_SIZE]);

impl IvSource for FixedIv {
    fn next_iv(&mut self) -> [u8; AES_BLOCK_SIZE] {
        self.0
    }
}

/// Encrypt `data`, returning ciphertext without the IV.
pub fn aes128_cbc_encrypt(key: &[u8], iv: &[u8; AES_BLOCK_SIZE], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes128CbcEnc::new_from_slices(key, iv)
        .map_err(|_| PdfError::EncryptionError(format!("invalid AES-128 key length {}", key.len())))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
}
