//! Caller privilege levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege of the caller asking the gateway to resolve a reference.
///
/// Derived from the caller's session: no session is [`Privilege::Anonymous`],
/// otherwise the role of the authenticated user decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    #[default]
    Anonymous,
    User,
    Admin,
}

impl Privilege {
    /// Whether this privilege is elevated (administrative).
    pub fn is_admin(self) -> bool {
        matches!(self, Privilege::Admin)
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Privilege::Anonymous => "anonymous",
            Privilege::User => "user",
            Privilege::Admin => "admin",
        };
        f.write_str(name)
    }
}
