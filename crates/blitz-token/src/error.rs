//! Error types for the token crate.

use thiserror::Error;

/// Reasons a token failed to decode.
///
/// Known oracle: every variant has its own message and callers are expected
/// to surface it unchanged. An attacker who can submit tokens and observe
/// `InvalidPadding` versus any other outcome can decrypt tokens and forge new
/// ones. Collapsing these variants would close the oracle and is a behavior
/// change for every client that matches on the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not valid base64 after undoing the URL-safe remap.
    #[error("invalid encoding")]
    InvalidEncoding,

    /// Shorter than one IV block.
    #[error("invalid ciphertext length")]
    InvalidCiphertextLength,

    /// Ciphertext after the IV is not a whole number of blocks.
    #[error("invalid ciphertext block size")]
    InvalidCiphertextBlockSize,

    /// PKCS#7 padding check failed after decryption.
    #[error("invalid padding")]
    InvalidPadding,

    /// Decrypted bytes are not UTF-8.
    #[error("invalid utf-8")]
    InvalidUtf8,
}

impl DecodeError {
    /// Stable message text, identical to the `Display` output.
    pub fn message(&self) -> &'static str {
        match self {
            DecodeError::InvalidEncoding => "invalid encoding",
            DecodeError::InvalidCiphertextLength => "invalid ciphertext length",
            DecodeError::InvalidCiphertextBlockSize => "invalid ciphertext block size",
            DecodeError::InvalidPadding => "invalid padding",
            DecodeError::InvalidUtf8 => "invalid utf-8",
        }
    }
}

/// Errors loading or parsing the reference key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key material is not hex.
    #[error("key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Key has a length AES does not accept.
    #[error("invalid key length: expected 16, 24 or 32 bytes, got {0}")]
    InvalidLength(usize),

    /// IO error (reading/writing key files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
