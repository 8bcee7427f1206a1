//! Password credential types.
//!
//! Type-safe wrapper for stored password hashes.

use core::fmt;

/// An opaque password hash (PHC string format).
///
/// The store treats this as an opaque credential: it is produced and checked
/// by the authentication service and never serialized or logged. `Debug`
/// output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap an already-computed password hash.
    #[must_use]
    pub const fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as a string slice (for verification).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

impl From<String> for HashedPassword {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}
