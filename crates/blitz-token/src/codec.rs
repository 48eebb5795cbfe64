//! Token encoding and decoding.

use crate::error::DecodeError;
use crate::keys::{KeyMaterial, SecretKey};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::{Engine, alphabet};
use rand::RngCore;

/// AES block size, which is also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Standard alphabet, padded, tolerating non-zero trailing bits in the last
/// symbol.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Encodes references into opaque tokens and back.
///
/// Holds the process key; construct once at startup and share it.
pub struct TokenCodec {
    key: SecretKey,
}

impl TokenCodec {
    /// Create a codec with the given key.
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    /// Encrypt a reference into a URL-safe token.
    ///
    /// Every call draws a fresh IV, so encoding the same reference twice gives
    /// different tokens. The empty string encodes to one block of padding.
    pub fn encode(&self, plaintext: &str) -> String {
        let mut iv = [0u8; BLOCK_SIZE];
        rand::rng().fill_bytes(&mut iv);

        let ciphertext = self.encrypt(&iv, plaintext.as_bytes());

        let mut combined = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
        combined.extend_from_slice(&iv);
        combined.extend_from_slice(&ciphertext);

        // Same output as standard base64 with `/`→`_`, `+`→`-` and `=` stripped.
        URL_SAFE_NO_PAD.encode(combined)
    }

    /// Decrypt a token back into its reference.
    ///
    /// The checks run in a fixed order and each failure has its own variant;
    /// see [`DecodeError`] for why that is an oracle.
    pub fn decode(&self, token: &str) -> Result<String, DecodeError> {
        let mut standard: String = token
            .chars()
            .map(|c| match c {
                '_' => '/',
                '-' => '+',
                other => other,
            })
            .collect();
        while standard.len() % 4 != 0 {
            standard.push('=');
        }

        let combined = LENIENT_STANDARD
            .decode(standard.as_bytes())
            .map_err(|_| DecodeError::InvalidEncoding)?;

        let (iv, ciphertext) = combined
            .split_first_chunk::<BLOCK_SIZE>()
            .ok_or(DecodeError::InvalidCiphertextLength)?;

        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(DecodeError::InvalidCiphertextBlockSize);
        }

        let plaintext = self.decrypt(iv, ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| DecodeError::InvalidUtf8)
    }

    fn encrypt(&self, iv: &[u8; BLOCK_SIZE], plaintext: &[u8]) -> Vec<u8> {
        match self.key.material() {
            KeyMaterial::Aes128(k) => cbc::Encryptor::<Aes128>::new(&(*k).into(), &(*iv).into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            KeyMaterial::Aes192(k) => cbc::Encryptor::<Aes192>::new(&(*k).into(), &(*iv).into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            KeyMaterial::Aes256(k) => cbc::Encryptor::<Aes256>::new(&(*k).into(), &(*iv).into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        }
    }

    fn decrypt(&self, iv: &[u8; BLOCK_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let result = match self.key.material() {
            KeyMaterial::Aes128(k) => cbc::Decryptor::<Aes128>::new(&(*k).into(), &(*iv).into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            KeyMaterial::Aes192(k) => cbc::Decryptor::<Aes192>::new(&(*k).into(), &(*iv).into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            KeyMaterial::Aes256(k) => cbc::Decryptor::<Aes256>::new(&(*k).into(), &(*iv).into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };
        result.map_err(|_| DecodeError::InvalidPadding)
    }
}
