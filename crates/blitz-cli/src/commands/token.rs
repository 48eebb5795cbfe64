//! Token commands.
//!
//! `blitz token encode` - Mint a token for a reference.
//! `blitz token decode` - Recover the reference inside a token.

use anyhow::Context;
use blitz_core::BlitzConfig;
use blitz_token::{SecretKey, TokenCodec, load_key};
use std::path::Path;

/// Resolve a key from a file path, a hex string or the configuration.
fn resolve_key(config: &BlitzConfig, key: Option<String>) -> anyhow::Result<SecretKey> {
    let Some(key_str) = key else {
        return load_key(&config.key).context("Failed to load the configured reference key");
    };

    let path = Path::new(&key_str);
    if path.exists() {
        return SecretKey::load_from_file(path)
            .with_context(|| format!("Failed to load key from file: {}", path.display()));
    }

    SecretKey::from_hex(key_str.trim())
        .context("Failed to parse key. Expected a hex-encoded 16, 24 or 32 byte AES key")
}

/// Encode a reference into a token.
pub fn encode(config: &BlitzConfig, key: Option<String>, reference: &str) -> anyhow::Result<String> {
    let codec = TokenCodec::new(resolve_key(config, key)?);
    Ok(codec.encode(reference))
}

/// Decode a token back into its reference.
pub fn decode(config: &BlitzConfig, key: Option<String>, token: &str) -> anyhow::Result<String> {
    let codec = TokenCodec::new(resolve_key(config, key)?);
    codec
        .decode(token.trim())
        .with_context(|| format!("Failed to decode token {token}"))
}
