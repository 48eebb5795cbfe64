//! CLI command implementations for the `blitz` binary.

pub mod keys;
pub mod serve;
pub mod token;
