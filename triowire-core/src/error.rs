/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the triowire record codec.
//!
//! Errors are split by the stage that raises them. Schema and registry errors
//! surface while the process builds its schema table and are fatal there.
//! Decode and encode errors are returned to the caller of a single codec call
//! and always name the offending field by its full path.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for all triowire operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Error while building or parsing a record schema.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Error in schema registration or message-type dispatch.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Error during record decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during record encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error reading or writing JSON schema definitions.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while constructing a record schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two sibling entries overlap, are out of order, or leave a gap.
    #[error("schema conflict in {schema}: '{first}' and '{second}' {detail}")]
    Conflict {
        /// Name of the schema being built.
        schema: String,
        /// Earlier entry of the offending pair.
        first: String,
        /// Later entry of the offending pair.
        second: String,
        /// What is wrong with the pair.
        detail: String,
    },

    /// Two entries in one schema share a name.
    #[error("duplicate entry '{name}' in schema {schema}")]
    DuplicateName {
        /// Name of the schema being built.
        schema: String,
        /// The repeated entry name.
        name: String,
    },

    /// An entry is structurally invalid (empty name, zero width, zero count).
    #[error("invalid entry '{name}' in schema {schema}: {reason}")]
    InvalidEntry {
        /// Name of the schema being built.
        schema: String,
        /// The offending entry name.
        name: String,
        /// Why the entry is rejected.
        reason: String,
    },

    /// Declared record length differs from the sum of its children.
    #[error("length mismatch in schema {schema}: declared {declared}, children sum to {computed}")]
    LengthMismatch {
        /// Name of the schema being built.
        schema: String,
        /// Declared total length in bytes.
        declared: usize,
        /// Sum of child lengths in bytes.
        computed: usize,
    },

    /// A line of layout text could not be parsed.
    #[error("layout parse error at line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// A composite layout references a block that was never declared.
    #[error("unknown block '{name}' referenced at line {line}")]
    UnknownBlock {
        /// The referenced block name.
        name: String,
        /// One-based line number of the reference.
        line: usize,
    },
}

/// Errors in schema registration and message-type dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A schema is already registered under this key.
    #[error("duplicate message type: {key}")]
    DuplicateKey {
        /// The colliding key.
        key: String,
    },

    /// No schema is registered under this key.
    #[error("unknown message type: {key}")]
    UnknownMessageType {
        /// The requested key.
        key: String,
    },

    /// The key is not a valid message-type identifier.
    #[error("invalid message type '{key}': {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why the key is rejected.
        reason: String,
    },

    /// The process-wide registry has already been installed.
    #[error("process-wide registry already installed")]
    AlreadyInstalled,
}

/// Errors that occur while decoding a fixed-width buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer length differs from the schema's total length.
    #[error("length mismatch for {record}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Path of the record being decoded.
        record: String,
        /// Schema length in bytes.
        expected: usize,
        /// Buffer length in bytes.
        actual: usize,
    },

    /// A repeating group ran out of bytes.
    #[error("truncated buffer for group {group}: need {needed} bytes, have {available}")]
    TruncatedBuffer {
        /// Path of the group being decoded.
        group: String,
        /// Bytes required for all repetitions.
        needed: usize,
        /// Bytes available in the slice.
        available: usize,
    },

    /// Field content does not match its declared kind.
    #[error("malformed field {field}: {reason}")]
    MalformedField {
        /// Path of the field.
        field: String,
        /// Why the content was rejected.
        reason: String,
    },

    /// A realtime packet is shorter than its frame header.
    #[error("frame too short: need {needed} bytes, have {available}")]
    FrameTooShort {
        /// Header length in bytes.
        needed: usize,
        /// Packet length in bytes.
        available: usize,
    },
}

impl DecodeError {
    /// Prefixes the path carried by this error with an enclosing scope.
    ///
    /// # Arguments
    /// * `scope` - Path of the enclosing record or group element
    #[must_use]
    pub fn within(self, scope: &str) -> Self {
        match self {
            Self::LengthMismatch {
                record,
                expected,
                actual,
            } => Self::LengthMismatch {
                record: join_path(scope, &record),
                expected,
                actual,
            },
            Self::TruncatedBuffer {
                group,
                needed,
                available,
            } => Self::TruncatedBuffer {
                group: join_path(scope, &group),
                needed,
                available,
            },
            Self::MalformedField { field, reason } => Self::MalformedField {
                field: join_path(scope, &field),
                reason,
            },
            other => other,
        }
    }
}

/// Errors that occur while encoding a record into a fixed-width buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The serialized value does not fit the field width.
    #[error("value too wide for {field}: {actual} bytes exceeds width {width}")]
    ValueTooWide {
        /// Path of the field.
        field: String,
        /// Field width in bytes.
        width: usize,
        /// Serialized length in bytes.
        actual: usize,
    },

    /// The value cannot be represented by the field's kind.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Path of the field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A field required by the schema is absent from the record.
    #[error("missing field {field}")]
    MissingField {
        /// Path of the field.
        field: String,
    },

    /// A repeating group value has the wrong number of elements.
    #[error("group count mismatch for {group}: expected {expected}, found {actual}")]
    GroupCountMismatch {
        /// Path of the group.
        group: String,
        /// Fixed repetition count.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },
}

impl EncodeError {
    /// Prefixes the path carried by this error with an enclosing scope.
    ///
    /// # Arguments
    /// * `scope` - Path of the enclosing record or group element
    #[must_use]
    pub fn within(self, scope: &str) -> Self {
        match self {
            Self::ValueTooWide {
                field,
                width,
                actual,
            } => Self::ValueTooWide {
                field: join_path(scope, &field),
                width,
                actual,
            },
            Self::InvalidValue { field, reason } => Self::InvalidValue {
                field: join_path(scope, &field),
                reason,
            },
            Self::MissingField { field } => Self::MissingField {
                field: join_path(scope, &field),
            },
            Self::GroupCountMismatch {
                group,
                expected,
                actual,
            } => Self::GroupCountMismatch {
                group: join_path(scope, &group),
                expected,
                actual,
            },
        }
    }
}

fn join_path(scope: &str, inner: &str) -> String {
    if scope.is_empty() {
        inner.to_string()
    } else if inner.is_empty() {
        scope.to_string()
    } else {
        format!("{scope}.{inner}")
    }
}
