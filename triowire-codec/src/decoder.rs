/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven record decoder.
//!
//! The decoder slices a buffer at the offsets recorded in a [`RecordSchema`]
//! and parses every data entry. Fillers are skipped. Errors carry the path of
//! the offending entry relative to the record being decoded.

use crate::config::{CodecConfig, MalformedPolicy};
use crate::scalar::parse_value;
use crate::text::{TextEncoding, is_blank, trim_spaces, until_nul};
use tracing::warn;
use triowire_core::{DecodeError, DecodedRecord, FieldValue};
use triowire_schema::{Entry, FieldDescriptor, RecordSchema, RepeatingGroupDescriptor};

/// Record decoder bound to a codec configuration.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    /// Active configuration.
    config: &'a CodecConfig,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder for the given configuration.
    #[inline]
    #[must_use]
    pub const fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Decodes one record.
    ///
    /// # Arguments
    /// * `schema` - Layout of the record
    /// * `buf` - Exactly `schema.length()` bytes
    ///
    /// # Errors
    /// Returns `DecodeError::LengthMismatch` if the buffer length differs
    /// from the schema length, or `MalformedField` if a field does not match
    /// its kind under the reject policy. Paths are relative to the record.
    pub fn decode(&self, schema: &RecordSchema, buf: &[u8]) -> Result<DecodedRecord, DecodeError> {
        if buf.len() != schema.length() {
            return Err(DecodeError::LengthMismatch {
                record: String::new(),
                expected: schema.length(),
                actual: buf.len(),
            });
        }

        let mut record = DecodedRecord::with_capacity(schema.data_entries().count());
        for entry in schema.entries() {
            let bytes = &buf[entry.offset()..entry.end()];
            match entry {
                Entry::Field(field) => {
                    let value = self.decode_scalar(field, bytes, schema.name())?;
                    record.insert(field.name.as_str(), value);
                }
                Entry::Group(group) => {
                    let rows = self.decode_group(group, bytes)?;
                    record.insert(group.name.as_str(), rows);
                }
                Entry::Block(block) => {
                    let inner = self
                        .decode(&block.schema, bytes)
                        .map_err(|e| e.within(&block.name))?;
                    record.insert(block.name.as_str(), inner);
                }
                Entry::Filler(_) => {}
            }
        }
        Ok(record)
    }

    /// Decodes every element of a repeating group.
    ///
    /// The result always holds exactly `group.count` elements; blank
    /// trailing elements are decoded like any other.
    ///
    /// # Arguments
    /// * `group` - The group descriptor
    /// * `slice` - Bytes starting at the first element
    ///
    /// # Errors
    /// Returns `DecodeError::TruncatedBuffer` if the slice is shorter than
    /// `count * element length`.
    pub fn decode_group(
        &self,
        group: &RepeatingGroupDescriptor,
        slice: &[u8],
    ) -> Result<Vec<DecodedRecord>, DecodeError> {
        let needed = group.length();
        if slice.len() < needed {
            return Err(DecodeError::TruncatedBuffer {
                group: group.name.clone(),
                needed,
                available: slice.len(),
            });
        }

        (0..group.count)
            .map(|index| {
                self.decode(&group.schema, &slice[group.element_range(index)])
                    .map_err(|e| e.within(&format!("{}[{}]", group.name, index)))
            })
            .collect()
    }

    /// Decodes a buffer of back-to-back records of one schema.
    ///
    /// Unlike [`decode`](Self::decode), error paths start with the schema
    /// name and element index (`c8201OutBlock1[2].bal_qtyz16`).
    ///
    /// # Errors
    /// Returns `DecodeError::LengthMismatch` if the buffer length is not a
    /// multiple of the record length.
    pub fn decode_array(
        &self,
        schema: &RecordSchema,
        buf: &[u8],
    ) -> Result<Vec<DecodedRecord>, DecodeError> {
        let length = schema.length();
        if buf.len() % length != 0 {
            return Err(DecodeError::LengthMismatch {
                record: schema.name().to_string(),
                expected: (buf.len() / length + 1) * length,
                actual: buf.len(),
            });
        }

        buf.chunks_exact(length)
            .enumerate()
            .map(|(index, chunk)| {
                self.decode(schema, chunk)
                    .map_err(|e| e.within(&format!("{}[{}]", schema.name(), index)))
            })
            .collect()
    }

    /// Decodes one scalar field.
    ///
    /// # Arguments
    /// * `field` - The field descriptor
    /// * `bytes` - Exactly `field.length` bytes
    ///
    /// # Errors
    /// Returns `DecodeError::LengthMismatch` if the slice width differs from
    /// the field width, or `MalformedField` under the reject policy.
    pub fn decode_field(
        &self,
        field: &FieldDescriptor,
        bytes: &[u8],
    ) -> Result<FieldValue, DecodeError> {
        if bytes.len() != field.length {
            return Err(DecodeError::LengthMismatch {
                record: field.name.clone(),
                expected: field.length,
                actual: bytes.len(),
            });
        }
        self.decode_scalar(field, bytes, "")
    }

    fn decode_scalar(
        &self,
        field: &FieldDescriptor,
        bytes: &[u8],
        scope: &str,
    ) -> Result<FieldValue, DecodeError> {
        if is_blank(bytes) {
            return Ok(if field.kind.is_textual() {
                FieldValue::Text(String::new())
            } else {
                FieldValue::Empty
            });
        }

        match parse_value(field, bytes, self.config.encoding) {
            Ok(value) => Ok(value),
            Err(reason) => match self.config.malformed {
                MalformedPolicy::Reject => Err(DecodeError::MalformedField {
                    field: field.name.clone(),
                    reason,
                }),
                MalformedPolicy::Substitute => {
                    let raw = raw_text(bytes, self.config.encoding);
                    warn!(
                        "{}: substituting unparsed value {:?} for {}: {}",
                        scope, raw, field.name, reason
                    );
                    Ok(FieldValue::Unparsed(raw))
                }
            },
        }
    }
}

fn raw_text(bytes: &[u8], encoding: TextEncoding) -> String {
    let content = trim_spaces(until_nul(bytes));
    match encoding.decode(content) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(content).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triowire_schema::{FieldKind, SchemaBuilder};

    fn quote() -> RecordSchema {
        SchemaBuilder::new("quote")
            .field("code", 6, FieldKind::Text)
            .field("price", 7, FieldKind::Unsigned)
            .build()
            .unwrap()
    }

    fn ticks() -> RecordSchema {
        let row = SchemaBuilder::new("tick")
            .field("time", 6, FieldKind::Text)
            .field("qty", 2, FieldKind::Signed)
            .build()
            .unwrap();
        SchemaBuilder::new("ticks")
            .field("code", 6, FieldKind::Text)
            .group("rows", row, 20)
            .build()
            .unwrap()
    }

    #[test]
    fn test_decode_quote_as_text_and_number() {
        let config = CodecConfig::default();
        let record = Decoder::new(&config)
            .decode(&quote(), b"0059301234567")
            .unwrap();
        assert_eq!(record.field("code"), Some(&FieldValue::from("005930")));
        assert_eq!(record.field("price"), Some(&FieldValue::UInt(1234567)));

        let numeric = SchemaBuilder::new("quote")
            .field("code", 6, FieldKind::Unsigned)
            .field("price", 7, FieldKind::Unsigned)
            .build()
            .unwrap();
        let record = Decoder::new(&config)
            .decode(&numeric, b"0059301234567")
            .unwrap();
        assert_eq!(record.field("code"), Some(&FieldValue::UInt(5930)));
    }

    #[test]
    fn test_decode_length_mismatch() {
        let config = CodecConfig::default();
        let err = Decoder::new(&config)
            .decode(&quote(), b"005930123456")
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::LengthMismatch {
                record: String::new(),
                expected: 13,
                actual: 12,
            }
        );
    }

    #[test]
    fn test_decode_group_always_yields_count_elements() {
        let config = CodecConfig::default();
        let schema = ticks();
        let mut buf = b"005930".to_vec();
        buf.extend_from_slice(b"09000101");
        buf.resize(schema.length(), b' ');

        let record = Decoder::new(&config).decode(&schema, &buf).unwrap();
        let rows = record.group("rows").unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].field("qty"), Some(&FieldValue::Int(1)));
        assert_eq!(rows[19].field("qty"), Some(&FieldValue::Empty));
        assert_eq!(rows[19].field("time"), Some(&FieldValue::from("")));
    }

    #[test]
    fn test_decode_group_truncated() {
        let config = CodecConfig::default();
        let schema = ticks();
        let Some(Entry::Group(group)) = schema.entry("rows") else {
            panic!("rows is a group");
        };
        let err = Decoder::new(&config)
            .decode_group(group, &[b' '; 159])
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedBuffer {
                group: "rows".to_string(),
                needed: 160,
                available: 159,
            }
        );
    }

    #[test]
    fn test_decode_malformed_path_names_group_element() {
        let config = CodecConfig::default();
        let schema = ticks();
        let mut buf = vec![b' '; schema.length()];
        let third = 6 + 3 * 8;
        buf[third + 6..third + 8].copy_from_slice(b"x1");

        let err = Decoder::new(&config).decode(&schema, &buf).unwrap_err();
        match err {
            DecodeError::MalformedField { field, .. } => assert_eq!(field, "rows[3].qty"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_substitute_policy() {
        let config = CodecConfig::default().with_malformed(MalformedPolicy::Substitute);
        let record = Decoder::new(&config)
            .decode(&quote(), b"00593012x4567")
            .unwrap();
        assert_eq!(
            record.field("price"),
            Some(&FieldValue::Unparsed("12x4567".to_string()))
        );
        assert_eq!(record.field("code"), Some(&FieldValue::from("005930")));
    }

    #[test]
    fn test_decode_array() {
        let config = CodecConfig::default();
        let decoder = Decoder::new(&config);
        let rows = decoder
            .decode_array(&quote(), b"00593000000010006600000002")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].field("code"), Some(&FieldValue::from("000660")));
        assert_eq!(rows[1].field("price"), Some(&FieldValue::UInt(2)));

        assert!(decoder.decode_array(&quote(), b"").unwrap().is_empty());

        let err = decoder
            .decode_array(&quote(), b"0059300000001000660000000x")
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedField { ref field, .. } if field == "quote[1].price"
        ));
        assert!(matches!(
            decoder.decode_array(&quote(), b"0059300000001000"),
            Err(DecodeError::LengthMismatch { actual: 16, .. })
        ));
    }

    #[test]
    fn test_decode_field_checks_width() {
        let config = CodecConfig::default();
        let field = FieldDescriptor::new("price", 0, 7, FieldKind::Unsigned);
        let decoder = Decoder::new(&config);
        assert_eq!(
            decoder.decode_field(&field, b"0000042").unwrap(),
            FieldValue::UInt(42)
        );
        assert!(decoder.decode_field(&field, b"42").is_err());
    }
}
