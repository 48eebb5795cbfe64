//! Decoy reference table.

use std::collections::HashMap;

/// Decoy references and the configuration key each one is served from.
///
/// Matched byte-for-byte against the decoded reference; traversal segments
/// are not collapsed, so only these exact spellings hit.
const DECOY_REFERENCES: &[(&str, &str)] = &[
    ("/flag.txt", "flag"),
    ("flag.txt", "flag"),
    ("../../flag.txt", "flag"),
    ("../../../flag.txt", "flag"),
    ("//flag.txt", "flag"),
    ("../flag.txt", "flag"),
];

/// Read-only map from decoy reference to configuration-store key.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: HashMap<&'static str, &'static str>,
}

impl PolicyTable {
    /// The built-in decoy table.
    pub fn builtin() -> Self {
        Self {
            entries: DECOY_REFERENCES.iter().copied().collect(),
        }
    }

    /// Configuration key for a reference, if it is a decoy.
    pub fn lookup(&self, reference: &str) -> Option<&'static str> {
        self.entries.get(reference).copied()
    }

    /// Number of decoy references.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
