//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input is empty (or only whitespace).
    #[error("username cannot be empty")]
    Empty,
    /// The input is too short.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains inner whitespace.
    #[error("username cannot contain whitespace")]
    ContainsWhitespace,
}

/// A canonical username.
///
/// Usernames are case-insensitive. Parsing trims surrounding whitespace and
/// lowercases the result, and every lookup goes through [`Username::parse`],
/// so `Alice`, ` alice ` and `ALICE` all name the same account.
///
/// ## Constraints
///
/// - Length: 3-50 characters after trimming
/// - No whitespace inside the name
///
/// ## Examples
///
/// ```
/// use shopfront_core::Username;
///
/// let name = Username::parse("  Alice ").unwrap();
/// assert_eq!(name.as_str(), "alice");
///
/// assert!(Username::parse("").is_err());        // empty
/// assert!(Username::parse("al").is_err());      // too short
/// assert!(Username::parse("al ice").is_err());  // inner whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 50;

    /// Parse and canonicalize a `Username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input:
    /// - Is empty
    /// - Is shorter than 3 or longer than 50 characters
    /// - Contains whitespace
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }

        let len = trimmed.chars().count();
        if len < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if len > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(UsernameError::ContainsWhitespace);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the canonical username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("bob_smith").is_ok());
        assert!(Username::parse("user.name-42").is_ok());
        assert!(Username::parse("abc").is_ok());
    }

    #[test]
    fn test_parse_canonicalizes_case_and_whitespace() {
        let name = Username::parse("  AlIcE\t").unwrap();
        assert_eq!(name.as_str(), "alice");
        assert_eq!(name, Username::parse("ALICE").unwrap());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Username::parse(""), Err(UsernameError::Empty));
        assert_eq!(Username::parse("   "), Err(UsernameError::Empty));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { min: 3 })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(51);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { max: 50 })
        ));
        assert!(Username::parse(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_parse_inner_whitespace() {
        assert_eq!(
            Username::parse("al ice"),
            Err(UsernameError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_display() {
        let name = Username::parse("Alice").unwrap();
        assert_eq!(format!("{name}"), "alice");
    }

    #[test]
    fn test_serde_canonicalizes_on_deserialize() {
        let parsed: Username = serde_json::from_str("\"Bob\"").unwrap();
        assert_eq!(parsed.as_str(), "bob");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"bob\"");

        assert!(serde_json::from_str::<Username>("\"x\"").is_err());
    }

    #[test]
    fn test_from_str() {
        let name: Username = "Carol".parse().unwrap();
        assert_eq!(name.as_str(), "carol");
    }
}
