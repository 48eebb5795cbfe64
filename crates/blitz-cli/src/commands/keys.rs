//! Key management commands.
//!
//! `blitz keys generate` - Generate a new AES reference key.

use anyhow::Context;
use blitz_token::{KeySize, SecretKey};
use std::fs;
use std::path::PathBuf;

/// Generate a new random key of `size` bytes.
pub fn generate(size: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let size = KeySize::from_len(size).context("Key size must be 16, 24 or 32 bytes")?;
    let key = SecretKey::generate(size);

    if let Some(path) = output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        key.save_to_file(&path)
            .with_context(|| format!("Failed to write key to {}", path.display()))?;

        println!("✔ Generated {}-bit reference key:", size.byte_len() * 8);
        println!("  Key file: {}", path.display());
        println!();
        println!("⚠️  Anyone holding this key can mint and read every token.");
        println!();
        println!("Reference it from blitz.yaml:");
        println!("  key:");
        println!("    key_file: {}", path.display());
    } else {
        println!("{}", key.to_hex());
    }

    Ok(())
}
