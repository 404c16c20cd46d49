/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Text encodings and blank handling.
//!
//! Venue strings are CP949 (the Windows superset of EUC-KR) and may be cut
//! short by a NUL byte anywhere inside the field.

use encoding_rs::EUC_KR;
use memchr::memchr;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Encoding of text and code fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// Windows code page 949.
    #[default]
    Cp949,
    /// 7-bit ASCII only.
    Ascii,
}

impl TextEncoding {
    /// Decodes field bytes into a string.
    ///
    /// # Errors
    /// Returns a reason string if the bytes are not valid in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, String> {
        match self {
            Self::Cp949 => EUC_KR
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or_else(|| "invalid CP949 text".to_string()),
            Self::Ascii => {
                if bytes.is_ascii() {
                    // ASCII is a subset of UTF-8.
                    std::str::from_utf8(bytes)
                        .map(Cow::Borrowed)
                        .map_err(|e| e.to_string())
                } else {
                    Err("non-ASCII byte in text".to_string())
                }
            }
        }
    }

    /// Encodes a string into field bytes.
    ///
    /// # Errors
    /// Returns a reason string if a character cannot be represented.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, String> {
        match self {
            Self::Cp949 => {
                let (bytes, _, unmappable) = EUC_KR.encode(text);
                if unmappable {
                    Err(format!("'{}' cannot be represented in CP949", text))
                } else {
                    Ok(bytes)
                }
            }
            Self::Ascii => {
                if text.is_ascii() {
                    Ok(Cow::Borrowed(text.as_bytes()))
                } else {
                    Err(format!("'{}' is not ASCII", text))
                }
            }
        }
    }
}

/// Returns the field content up to the first NUL byte.
#[inline]
#[must_use]
pub fn until_nul(bytes: &[u8]) -> &[u8] {
    match memchr(0, bytes) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Removes leading and trailing spaces.
#[inline]
#[must_use]
pub fn trim_spaces(bytes: &[u8]) -> &[u8] {
    trim_end_spaces(trim_start_spaces(bytes))
}

/// Removes leading spaces.
#[inline]
#[must_use]
pub fn trim_start_spaces(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b' ').unwrap_or(bytes.len());
    &bytes[start..]
}

/// Removes trailing spaces.
#[inline]
#[must_use]
pub fn trim_end_spaces(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    &bytes[..end]
}

/// Returns true if the field holds only spaces and NUL bytes.
#[inline]
#[must_use]
pub fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == b' ' || b == 0)
}
