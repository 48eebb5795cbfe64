//! # blitz-token
//!
//! Opaque reference tokens for the Blitz gateway.
//!
//! A token stands in for a server-side file path. It is
//! `base64url(IV ‖ AES-CBC(PKCS#7(path)))` with the URL-safe alphabet and no
//! `=` padding, so it can travel in a query string.
//!
//! ## Properties
//!
//! | Property | Holds? |
//! |----------|--------|
//! | Reversible with the process key | yes |
//! | Fresh IV per encryption | yes |
//! | Integrity protected | **no** |
//! | Uniform decode errors | **no** (see [`DecodeError`]) |
//!
//! Tokens are confidentiality-only. Decode failures are reported with distinct
//! variants and messages, which makes [`TokenCodec::decode`] a padding oracle.

pub mod codec;
pub mod error;
pub mod keys;

pub use codec::{BLOCK_SIZE, TokenCodec};
pub use error::{DecodeError, KeyError};
pub use keys::{KeySize, SecretKey, load_key};
