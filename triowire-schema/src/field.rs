/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field descriptors.
//!
//! This module defines how a single fixed-width field is sliced and interpreted:
//! - [`FieldKind`]: The semantic kind that drives parsing and formatting
//! - [`Padding`]: How a value narrower than the field is justified
//! - [`FieldDescriptor`]: Name, offset, width, kind, and padding of one field
//! - [`FillerDescriptor`]: Reserved bytes that are never decoded

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Largest implicit decimal scale a fixed-point field may declare.
pub const MAX_SCALE: u32 = 28;

/// Semantic kind of a fixed-width field.
///
/// Serialized with the same spelling the layout table uses (`"fixed(2)"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    /// Unsigned integer digits.
    Unsigned,
    /// Signed-magnitude integer: optional `+` or `-` followed by digits.
    Signed,
    /// Fixed-point number with an implicit decimal scale.
    Fixed {
        /// Number of implied fractional digits.
        scale: u32,
    },
    /// Decimal literal with an explicit point.
    Decimal,
    /// Enumerated code. An empty list accepts any code.
    Code {
        /// Accepted codes.
        codes: Vec<String>,
    },
    /// Free text.
    Text,
    /// Date string parsed with a chrono format.
    Date {
        /// chrono format string, e.g. `%Y%m%d`.
        format: String,
    },
    /// Time string parsed with a chrono format.
    Time {
        /// chrono format string, e.g. `%H%M%S`.
        format: String,
    },
}

impl FieldKind {
    /// Creates a fixed-point kind.
    #[must_use]
    pub const fn fixed(scale: u32) -> Self {
        Self::Fixed { scale }
    }

    /// Creates an enumerated code kind accepting the given codes.
    #[must_use]
    pub fn code<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Code {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an enumerated code kind accepting any code.
    #[must_use]
    pub const fn any_code() -> Self {
        Self::Code { codes: Vec::new() }
    }

    /// Creates a date kind.
    #[must_use]
    pub fn date(format: impl Into<String>) -> Self {
        Self::Date {
            format: format.into(),
        }
    }

    /// Creates a time kind.
    #[must_use]
    pub fn time(format: impl Into<String>) -> Self {
        Self::Time {
            format: format.into(),
        }
    }

    /// Returns true if this kind represents a number.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Unsigned | Self::Signed | Self::Fixed { .. } | Self::Decimal
        )
    }

    /// Returns true if this kind is text-like (text or enumerated code).
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Code { .. })
    }

    /// Returns the padding used when a descriptor does not override it.
    #[must_use]
    pub const fn default_padding(&self) -> Padding {
        if self.is_numeric() {
            Padding::ZeroLeft
        } else {
            Padding::SpaceRight
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned => write!(f, "unsigned"),
            Self::Signed => write!(f, "signed"),
            Self::Fixed { scale } => write!(f, "fixed({})", scale),
            Self::Decimal => write!(f, "decimal"),
            Self::Code { codes } if codes.is_empty() => write!(f, "code"),
            Self::Code { codes } => write!(f, "code({})", codes.join(",")),
            Self::Text => write!(f, "text"),
            Self::Date { format } => write!(f, "date({})", format),
            Self::Time { format } => write!(f, "time({})", format),
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    /// Parses the layout-table spelling of a kind.
    ///
    /// Accepted forms: `unsigned`, `signed`, `fixed(N)`, `decimal`, `code`,
    /// `code(A,B,...)`, `text`, `date(FMT)`, `time(FMT)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, arg) = match s.find('(') {
            Some(open) => {
                let close = s
                    .strip_suffix(')')
                    .ok_or_else(|| format!("unterminated argument in kind '{}'", s))?;
                (&s[..open], Some(&close[open + 1..]))
            }
            None => (s, None),
        };

        match (head.to_ascii_lowercase().as_str(), arg) {
            ("unsigned", None) => Ok(Self::Unsigned),
            ("signed", None) => Ok(Self::Signed),
            ("decimal", None) => Ok(Self::Decimal),
            ("text", None) => Ok(Self::Text),
            ("code", None) => Ok(Self::any_code()),
            ("code", Some(list)) => {
                let codes: Vec<&str> = list.split(',').map(str::trim).collect();
                if codes.iter().any(|c| c.is_empty() || c.contains(['(', ')'])) {
                    return Err(format!("empty code in '{}'", s));
                }
                Ok(Self::code(codes))
            }
            ("fixed", Some(scale)) => scale
                .trim()
                .parse()
                .map(Self::fixed)
                .map_err(|_| format!("invalid scale in '{}'", s)),
            ("date", Some(format)) if !format.is_empty() => Ok(Self::date(format)),
            ("time", Some(format)) if !format.is_empty() => Ok(Self::time(format)),
            _ => Err(format!("unknown field kind '{}'", s)),
        }
    }
}

impl TryFrom<String> for FieldKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.to_string()
    }
}

/// Justification applied when a value is narrower than its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Padding {
    /// Right-justified, zero filled; a sign precedes the zeros.
    ZeroLeft,
    /// Right-justified, space filled.
    SpaceLeft,
    /// Left-justified, space filled.
    SpaceRight,
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ZeroLeft => "zero-left",
            Self::SpaceLeft => "space-left",
            Self::SpaceRight => "space-right",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Padding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero-left" => Ok(Self::ZeroLeft),
            "space-left" => Ok(Self::SpaceLeft),
            "space-right" => Ok(Self::SpaceRight),
            _ => Err(format!("unknown padding '{}'", s)),
        }
    }
}

/// Definition of one fixed-width field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its schema.
    pub name: String,
    /// Byte offset within the owning record.
    pub offset: usize,
    /// Width in bytes.
    pub length: usize,
    /// Semantic kind.
    pub kind: FieldKind,
    /// Justification for values narrower than the field.
    pub padding: Padding,
}

impl FieldDescriptor {
    /// Creates a new field descriptor with the kind's default padding.
    ///
    /// # Arguments
    /// * `name` - The field name
    /// * `offset` - Byte offset within the record
    /// * `length` - Width in bytes
    /// * `kind` - The semantic kind
    #[must_use]
    pub fn new(name: impl Into<String>, offset: usize, length: usize, kind: FieldKind) -> Self {
        let padding = kind.default_padding();
        Self {
            name: name.into(),
            offset,
            length,
            kind,
            padding,
        }
    }

    /// Overrides the padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Returns the byte range occupied by the field.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Reserved bytes inside a record.
///
/// The venue places a one-byte attribute slot after every data field; those
/// slots are described as fillers so the layout stays contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillerDescriptor {
    /// Diagnostic name (the attribute slot of `code` is `_code`).
    pub name: String,
    /// Byte offset within the owning record.
    pub offset: usize,
    /// Width in bytes.
    pub length: usize,
}

impl FillerDescriptor {
    /// Creates a new filler descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
        }
    }

    /// Returns the byte range occupied by the filler.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}
