/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Codec configuration.
//!
//! This module provides the options that control how malformed content,
//! text, reserved bytes, and absent fields are handled.

use crate::text::TextEncoding;
use serde::{Deserialize, Serialize};

/// What the decoder does with a field whose bytes do not match its kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Fail the whole record with `DecodeError::MalformedField`.
    #[default]
    Reject,
    /// Keep the raw text as `FieldValue::Unparsed`, log a warning, and continue.
    Substitute,
}

/// Configuration for a [`Codec`](crate::Codec).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Malformed-field policy applied on decode.
    pub malformed: MalformedPolicy,
    /// Encoding of text and code fields.
    pub encoding: TextEncoding,
    /// Byte written into fillers and attribute slots on encode.
    pub fill_byte: u8,
    /// Whether encoding fails when a schema entry is absent from the record.
    pub strict_encode: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            malformed: MalformedPolicy::Reject,
            encoding: TextEncoding::Cp949,
            fill_byte: b' ',
            strict_encode: false,
        }
    }
}

impl CodecConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the malformed-field policy.
    #[must_use]
    pub const fn with_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }

    /// Sets the text encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the byte written into fillers.
    #[must_use]
    pub const fn with_fill_byte(mut self, fill_byte: u8) -> Self {
        self.fill_byte = fill_byte;
        self
    }

    /// Sets whether absent entries are an encode error.
    #[must_use]
    pub const fn with_strict_encode(mut self, strict: bool) -> Self {
        self.strict_encode = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.malformed, MalformedPolicy::Reject);
        assert_eq!(config.encoding, TextEncoding::Cp949);
        assert_eq!(config.fill_byte, b' ');
        assert!(!config.strict_encode);
    }

    #[test]
    fn test_config_builder() {
        let config = CodecConfig::new()
            .with_malformed(MalformedPolicy::Substitute)
            .with_encoding(TextEncoding::Ascii)
            .with_fill_byte(0)
            .with_strict_encode(true);
        assert_eq!(config.malformed, MalformedPolicy::Substitute);
        assert_eq!(config.encoding, TextEncoding::Ascii);
        assert_eq!(config.fill_byte, 0);
        assert!(config.strict_encode);
    }
}
