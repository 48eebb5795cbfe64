//! Key management for reference tokens.

use crate::error::KeyError;
use blitz_core::KeyConfig;
use rand::RngCore;
use std::fmt;
use std::path::Path;
use zeroize::Zeroize;

/// Key used when nothing is configured. Tokens minted with it are readable by
/// anyone holding the source, so it only makes sense for local development.
const DEVELOPMENT_KEY: &[u8; 16] = b"YELLOW_SUBMARINE";

/// AES key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    /// Map a byte length to a key size.
    pub fn from_len(len: usize) -> Result<Self, KeyError> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            other => Err(KeyError::InvalidLength(other)),
        }
    }
}

pub(crate) enum KeyMaterial {
    Aes128([u8; 16]),
    Aes192([u8; 24]),
    Aes256([u8; 32]),
}

/// A symmetric AES key, immutable once constructed and wiped on drop.
pub struct SecretKey {
    material: KeyMaterial,
}

impl SecretKey {
    /// Generate a new random key.
    pub fn generate(size: KeySize) -> Self {
        let mut rng = rand::rng();
        let material = match size {
            KeySize::Aes128 => {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                KeyMaterial::Aes128(bytes)
            }
            KeySize::Aes192 => {
                let mut bytes = [0u8; 24];
                rng.fill_bytes(&mut bytes);
                KeyMaterial::Aes192(bytes)
            }
            KeySize::Aes256 => {
                let mut bytes = [0u8; 32];
                rng.fill_bytes(&mut bytes);
                KeyMaterial::Aes256(bytes)
            }
        };
        Self { material }
    }

    /// Build a key from raw bytes (16, 24 or 32 of them).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let invalid = |_: std::array::TryFromSliceError| KeyError::InvalidLength(bytes.len());
        let material = match KeySize::from_len(bytes.len())? {
            KeySize::Aes128 => KeyMaterial::Aes128(bytes.try_into().map_err(invalid)?),
            KeySize::Aes192 => KeyMaterial::Aes192(bytes.try_into().map_err(invalid)?),
            KeySize::Aes256 => KeyMaterial::Aes256(bytes.try_into().map_err(invalid)?),
        };
        Ok(Self { material })
    }

    /// Parse a hex-encoded key.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let mut bytes = hex::decode(hex.trim())?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// The built-in development key.
    pub fn development() -> Self {
        Self {
            material: KeyMaterial::Aes128(*DEVELOPMENT_KEY),
        }
    }

    /// Size of this key.
    pub fn size(&self) -> KeySize {
        match self.material {
            KeyMaterial::Aes128(_) => KeySize::Aes128,
            KeyMaterial::Aes192(_) => KeySize::Aes192,
            KeyMaterial::Aes256(_) => KeySize::Aes256,
        }
    }

    /// Hex encoding of the key.
    pub fn to_hex(&self) -> String {
        match &self.material {
            KeyMaterial::Aes128(k) => hex::encode(k),
            KeyMaterial::Aes192(k) => hex::encode(k),
            KeyMaterial::Aes256(k) => hex::encode(k),
        }
    }

    /// Save the key to a file as hex.
    pub fn save_to_file(&self, path: &Path) -> Result<(), KeyError> {
        std::fs::write(path, self.to_hex())?;
        Ok(())
    }

    /// Load a key from a file containing hex.
    pub fn load_from_file(path: &Path) -> Result<Self, KeyError> {
        let mut hex = std::fs::read_to_string(path)?;
        let key = Self::from_hex(&hex);
        hex.zeroize();
        key
    }

    pub(crate) fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

impl Clone for SecretKey {
    fn clone(&self) -> Self {
        let material = match &self.material {
            KeyMaterial::Aes128(k) => KeyMaterial::Aes128(*k),
            KeyMaterial::Aes192(k) => KeyMaterial::Aes192(*k),
            KeyMaterial::Aes256(k) => KeyMaterial::Aes256(*k),
        };
        Self { material }
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        match &mut self.material {
            KeyMaterial::Aes128(k) => k.zeroize(),
            KeyMaterial::Aes192(k) => k.zeroize(),
            KeyMaterial::Aes256(k) => k.zeroize(),
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// Load the process key from configuration.
///
/// Falls back to the development key only when no key source is configured at
/// all; a warning is logged because those tokens are not secret. A configured
/// source that cannot be resolved is an error.
pub fn load_key(config: &KeyConfig) -> Result<SecretKey, KeyError> {
    match config.resolve_key_hex()? {
        Some(hex) => {
            let key = SecretKey::from_hex(&hex)?;
            tracing::info!(size = ?key.size(), "Loaded reference key");
            Ok(key)
        }
        None => {
            tracing::warn!("No reference key configured, using the built-in development key");
            Ok(SecretKey::development())
        }
    }
}
