/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven record encoder.
//!
//! Entries of a schema tile the record in offset order, so the encoder
//! appends each entry to the output buffer in turn. Fillers are written with
//! the configured fill byte and blank fields with spaces.

use crate::config::CodecConfig;
use crate::scalar::{format_value, pad_into};
use bytes::{BufMut, BytesMut};
use triowire_core::{DecodedRecord, EncodeError, FieldValue, Value};
use triowire_schema::{Entry, FieldDescriptor, RecordSchema};

static EMPTY: DecodedRecord = DecodedRecord::new();

/// Record encoder bound to a codec configuration.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    /// Active configuration.
    config: &'a CodecConfig,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder for the given configuration.
    #[inline]
    #[must_use]
    pub const fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Encodes one record.
    ///
    /// # Arguments
    /// * `schema` - Layout of the record
    /// * `record` - Values keyed by entry name
    ///
    /// # Returns
    /// A buffer of exactly `schema.length()` bytes.
    ///
    /// # Errors
    /// Returns an `EncodeError` naming the offending entry by its path
    /// relative to the record.
    pub fn encode(
        &self,
        schema: &RecordSchema,
        record: &DecodedRecord,
    ) -> Result<BytesMut, EncodeError> {
        let mut out = BytesMut::with_capacity(schema.length());
        self.encode_into(schema, record, &mut out)?;
        Ok(out)
    }

    /// Appends one encoded record to `out`.
    ///
    /// # Errors
    /// Same as [`encode`](Self::encode).
    pub fn encode_into(
        &self,
        schema: &RecordSchema,
        record: &DecodedRecord,
        out: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        for entry in schema.entries() {
            match entry {
                Entry::Field(field) => match record.get(&field.name) {
                    Some(Value::Field(value)) => self.put_field(field, value, out)?,
                    Some(_) => {
                        return Err(EncodeError::InvalidValue {
                            field: field.name.clone(),
                            reason: "expected a scalar value".to_string(),
                        });
                    }
                    None => {
                        self.check_present(&field.name)?;
                        out.put_bytes(b' ', field.length);
                    }
                },
                Entry::Group(group) => {
                    let rows = match record.get(&group.name) {
                        Some(Value::Group(rows)) => Some(rows.as_slice()),
                        Some(_) => {
                            return Err(EncodeError::InvalidValue {
                                field: group.name.clone(),
                                reason: "expected a repeating group".to_string(),
                            });
                        }
                        None => {
                            self.check_present(&group.name)?;
                            None
                        }
                    };
                    match rows {
                        Some(rows) if rows.len() != group.count => {
                            return Err(EncodeError::GroupCountMismatch {
                                group: group.name.clone(),
                                expected: group.count,
                                actual: rows.len(),
                            });
                        }
                        _ => {}
                    }
                    for index in 0..group.count {
                        let row = rows.map_or(&EMPTY, |rows| &rows[index]);
                        self.encode_into(&group.schema, row, out)
                            .map_err(|e| e.within(&format!("{}[{}]", group.name, index)))?;
                    }
                }
                Entry::Block(block) => {
                    let inner = match record.get(&block.name) {
                        Some(Value::Record(inner)) => inner,
                        Some(_) => {
                            return Err(EncodeError::InvalidValue {
                                field: block.name.clone(),
                                reason: "expected an embedded block".to_string(),
                            });
                        }
                        None => {
                            self.check_present(&block.name)?;
                            &EMPTY
                        }
                    };
                    self.encode_into(&block.schema, inner, out)
                        .map_err(|e| e.within(&block.name))?;
                }
                Entry::Filler(filler) => out.put_bytes(self.config.fill_byte, filler.length),
            }
        }
        Ok(())
    }

    /// Encodes one scalar field into a buffer of exactly `field.length` bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueTooWide` or `InvalidValue`.
    pub fn encode_field(
        &self,
        field: &FieldDescriptor,
        value: &FieldValue,
    ) -> Result<BytesMut, EncodeError> {
        let mut out = BytesMut::with_capacity(field.length);
        self.put_field(field, value, &mut out)?;
        Ok(out)
    }

    fn put_field(
        &self,
        field: &FieldDescriptor,
        value: &FieldValue,
        out: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        let repr = format_value(field, value, self.config.encoding)?;
        pad_into(field, repr.as_deref(), out)
    }

    fn check_present(&self, name: &str) -> Result<(), EncodeError> {
        if self.config.strict_encode {
            return Err(EncodeError::MissingField {
                field: name.to_string(),
            });
        }
        Ok(())
    }
}
