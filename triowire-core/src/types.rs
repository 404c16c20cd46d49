/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core identifier types.
//!
//! - [`MessageType`]: Registry key naming a block or transaction shape

use crate::error::RegistryError;
use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for message-type identifiers in bytes.
pub const MESSAGE_TYPE_MAX_LEN: usize = 32;

/// Identifier of a registered record shape.
///
/// Transactions are keyed by their code (`"c1101"`, `"s4101"`) and individual
/// blocks by their block name (`"c1101OutBlock2"`). Identifiers are short
/// ASCII strings made of letters, digits, and underscores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct MessageType(ArrayString<MESSAGE_TYPE_MAX_LEN>);

impl MessageType {
    /// Creates a new message type from a string slice.
    ///
    /// # Arguments
    /// * `s` - The identifier
    ///
    /// # Returns
    /// `Some(MessageType)` if the identifier is valid, `None` otherwise.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the length of the identifier in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the identifier is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for MessageType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RegistryError::InvalidKey {
            key: s.to_string(),
            reason: reason.to_string(),
        };
        if s.is_empty() {
            return Err(invalid("empty identifier"));
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(invalid("only ASCII letters, digits, and '_' are allowed"));
        }
        ArrayString::from(s)
            .map(Self)
            .map_err(|_| invalid("identifier too long"))
    }
}

impl TryFrom<&str> for MessageType {
    type Error = RegistryError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type() {
        let key = MessageType::new("c1101OutBlock2").unwrap();
        assert_eq!(key.as_str(), "c1101OutBlock2");
        assert_eq!(key.len(), 14);
        assert!(!key.is_empty());
        assert_eq!(key.to_string(), "c1101OutBlock2");
    }

    #[test]
    fn test_message_type_too_long() {
        let long_str = "a".repeat(MESSAGE_TYPE_MAX_LEN + 1);
        assert!(MessageType::new(&long_str).is_none());
    }

    #[test]
    fn test_message_type_rejects_invalid_chars() {
        let err = "c1101 out".parse::<MessageType>().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidKey { .. }));
        assert!(MessageType::new("").is_none());
    }
}
