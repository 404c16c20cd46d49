/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Record schemas.
//!
//! A [`RecordSchema`] is an ordered sequence of [`Entry`] values that tile a
//! fixed-length record with no gaps and no overlaps. Every schema is checked
//! when it is constructed, so a value of this type always satisfies:
//! - every entry has a positive width and a non-empty name
//! - data entries (fields, groups, blocks) have unique names
//! - entries start at offset 0, appear in increasing offset order, and each
//!   entry starts exactly where the previous one ends
//! - the record length equals the sum of the entry widths

use crate::field::{FieldDescriptor, FieldKind, FillerDescriptor, MAX_SCALE, Padding};
use crate::group::{EmbeddedBlock, RepeatingGroupDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use triowire_core::{Error, SchemaError};

/// One entry of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum Entry {
    /// Scalar field.
    Field(FieldDescriptor),
    /// Fixed-count repeating group.
    Group(RepeatingGroupDescriptor),
    /// Block embedded once.
    Block(EmbeddedBlock),
    /// Reserved bytes.
    Filler(FillerDescriptor),
}

impl Entry {
    /// Returns the entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field(f) => &f.name,
            Self::Group(g) => &g.name,
            Self::Block(b) => &b.name,
            Self::Filler(f) => &f.name,
        }
    }

    /// Returns the byte offset within the owning record.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Field(f) => f.offset,
            Self::Group(g) => g.offset,
            Self::Block(b) => b.offset,
            Self::Filler(f) => f.offset,
        }
    }

    /// Returns the total width in bytes.
    #[must_use]
    pub fn length(&self) -> usize {
        match self {
            Self::Field(f) => f.length,
            Self::Group(g) => g.length(),
            Self::Block(b) => b.length(),
            Self::Filler(f) => f.length,
        }
    }

    /// Returns the offset one past the last byte of the entry.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset().saturating_add(self.length())
    }

    /// Returns true for fillers, which carry no decoded value.
    #[must_use]
    pub const fn is_filler(&self) -> bool {
        matches!(self, Self::Filler(_))
    }

    fn with_offset(self, offset: usize) -> Self {
        match self {
            Self::Field(mut f) => {
                f.offset = offset;
                Self::Field(f)
            }
            Self::Group(mut g) => {
                g.offset = offset;
                Self::Group(g)
            }
            Self::Block(mut b) => {
                b.offset = offset;
                Self::Block(b)
            }
            Self::Filler(mut f) => {
                f.offset = offset;
                Self::Filler(f)
            }
        }
    }
}

/// Validated layout of one fixed-length record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct RecordSchema {
    name: String,
    length: usize,
    entries: Vec<Entry>,
}

impl RecordSchema {
    /// Creates a schema from entries with explicit offsets.
    ///
    /// # Arguments
    /// * `name` - The schema name (block or transaction name)
    /// * `entries` - Entries in offset order
    ///
    /// # Errors
    /// Returns `SchemaError::Conflict` if two entries overlap, are out of
    /// order, or leave a gap; `DuplicateName` or `InvalidEntry` for bad
    /// entries.
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::InvalidEntry {
                schema: String::new(),
                name: String::new(),
                reason: "schema name is empty".to_string(),
            });
        }
        if entries.is_empty() {
            return Err(SchemaError::InvalidEntry {
                schema: name.clone(),
                name: name.clone(),
                reason: "schema has no entries".to_string(),
            });
        }

        let length = check_tiling(&name, &entries)?;
        Ok(Self {
            name,
            length,
            entries,
        })
    }

    /// Creates a schema from entries, assigning offsets sequentially.
    ///
    /// Offsets already stored in the entries are ignored.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn sequential(name: impl Into<String>, entries: Vec<Entry>) -> Result<Self, SchemaError> {
        let mut offset = 0;
        let entries = entries
            .into_iter()
            .map(|entry| {
                let entry = entry.with_offset(offset);
                offset += entry.length();
                entry
            })
            .collect();
        Self::new(name, entries)
    }

    /// Checks the computed length against a declared one.
    ///
    /// # Errors
    /// Returns `SchemaError::LengthMismatch` if they differ.
    pub fn expect_length(self, declared: usize) -> Result<Self, SchemaError> {
        if declared != self.length {
            return Err(SchemaError::LengthMismatch {
                schema: self.name,
                declared,
                computed: self.length,
            });
        }
        Ok(self)
    }

    /// Returns the schema name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the total record length in bytes.
    #[inline]
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Returns the entries in offset order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the entries that produce a decoded value.
    pub fn data_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_filler())
    }

    /// Returns the scalar fields in offset order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Field(f) => Some(f),
            _ => None,
        })
    }

    /// Gets a data entry by name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.data_entries().find(|e| e.name() == name)
    }

    /// Gets a scalar field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    /// Returns the entry covering a byte offset.
    ///
    /// # Arguments
    /// * `offset` - Byte offset within the record
    #[must_use]
    pub fn entry_at(&self, offset: usize) -> Option<&Entry> {
        if offset >= self.length {
            return None;
        }
        let index = self.entries.partition_point(|e| e.end() <= offset);
        self.entries.get(index)
    }

    /// Parses a schema from its JSON definition.
    ///
    /// Entry offsets may be omitted; missing offsets continue from the end
    /// of the previous entry. The optional `length` member is checked
    /// against the computed length.
    ///
    /// # Errors
    /// Returns `Error::Json` if the text is not a valid definition. Layout
    /// violations are reported through the JSON error message.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the schema to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_tiling(schema: &str, entries: &[Entry]) -> Result<usize, SchemaError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        validate_entry(schema, entry)?;
        if !entry.is_filler() && !seen.insert(entry.name()) {
            return Err(SchemaError::DuplicateName {
                schema: schema.to_string(),
                name: entry.name().to_string(),
            });
        }
    }

    if let Some(pair) = entries.windows(2).find(|pair| pair[1].offset() < pair[0].offset()) {
        return Err(SchemaError::Conflict {
            schema: schema.to_string(),
            first: pair[0].name().to_string(),
            second: pair[1].name().to_string(),
            detail: format!(
                "out of order: second starts at {} before first at {}",
                pair[1].offset(),
                pair[0].offset()
            ),
        });
    }

    let mut expected = 0usize;
    let mut previous: Option<&str> = None;
    for entry in entries {
        let offset = entry.offset();
        if offset != expected {
            let detail = if offset < expected {
                format!(
                    "overlap: second starts at {} before first ends at {}",
                    offset, expected
                )
            } else {
                format!(
                    "leave a gap of {} bytes at offset {}",
                    offset - expected,
                    expected
                )
            };
            return Err(SchemaError::Conflict {
                schema: schema.to_string(),
                first: previous.unwrap_or("<record start>").to_string(),
                second: entry.name().to_string(),
                detail,
            });
        }
        expected = entry.end();
        previous = Some(entry.name());
    }
    Ok(expected)
}

fn validate_entry(schema: &str, entry: &Entry) -> Result<(), SchemaError> {
    let invalid = |reason: String| SchemaError::InvalidEntry {
        schema: schema.to_string(),
        name: entry.name().to_string(),
        reason,
    };

    if entry.name().is_empty() {
        return Err(invalid("entry name is empty".to_string()));
    }
    if matches!(entry, Entry::Group(group) if group.count == 0) {
        return Err(invalid("repetition count must be positive".to_string()));
    }
    match entry {
        Entry::Group(group) if group.checked_length().is_none() => {
            return Err(invalid(format!(
                "{} elements of {} bytes overflow the record length",
                group.count,
                group.element_length()
            )));
        }
        _ => {}
    }
    if entry.length() == 0 {
        return Err(invalid("width must be positive".to_string()));
    }
    if entry.offset().checked_add(entry.length()).is_none() {
        return Err(invalid(format!(
            "offset {} plus width {} overflows the record length",
            entry.offset(),
            entry.length()
        )));
    }

    if let Entry::Field(field) = entry {
        match &field.kind {
            FieldKind::Fixed { scale } if *scale > MAX_SCALE => {
                return Err(invalid(format!(
                    "scale {} exceeds the maximum of {}",
                    scale, MAX_SCALE
                )));
            }
            FieldKind::Code { codes } => {
                if let Some(code) = codes.iter().find(|c| c.len() > field.length) {
                    return Err(invalid(format!(
                        "code '{}' does not fit width {}",
                        code, field.length
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawSchema {
    name: String,
    #[serde(default)]
    length: Option<usize>,
    entries: Vec<RawEntry>,
}

#[derive(Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
enum RawEntry {
    Field {
        name: String,
        #[serde(default)]
        offset: Option<usize>,
        length: usize,
        kind: FieldKind,
        #[serde(default)]
        padding: Option<Padding>,
    },
    Group {
        name: String,
        #[serde(default)]
        offset: Option<usize>,
        count: usize,
        schema: RecordSchema,
    },
    Block {
        name: String,
        #[serde(default)]
        offset: Option<usize>,
        schema: RecordSchema,
    },
    Filler {
        name: String,
        #[serde(default)]
        offset: Option<usize>,
        length: usize,
    },
}

impl TryFrom<RawSchema> for RecordSchema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let mut cursor = 0;
        let mut entries = Vec::with_capacity(raw.entries.len());
        for raw_entry in raw.entries {
            let entry = match raw_entry {
                RawEntry::Field {
                    name,
                    offset,
                    length,
                    kind,
                    padding,
                } => {
                    let field = FieldDescriptor::new(name, offset.unwrap_or(cursor), length, kind);
                    Entry::Field(match padding {
                        Some(padding) => field.with_padding(padding),
                        None => field,
                    })
                }
                RawEntry::Group {
                    name,
                    offset,
                    count,
                    schema,
                } => Entry::Group(RepeatingGroupDescriptor::new(
                    name,
                    offset.unwrap_or(cursor),
                    schema,
                    count,
                )),
                RawEntry::Block {
                    name,
                    offset,
                    schema,
                } => Entry::Block(EmbeddedBlock::new(name, offset.unwrap_or(cursor), schema)),
                RawEntry::Filler {
                    name,
                    offset,
                    length,
                } => Entry::Filler(FillerDescriptor::new(name, offset.unwrap_or(cursor), length)),
            };
            cursor = entry.end();
            entries.push(entry);
        }

        let schema = Self::new(raw.name, entries)?;
        match raw.length {
            Some(declared) => schema.expect_length(declared),
            None => Ok(schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SchemaBuilder;

    fn quote_entries() -> Vec<Entry> {
        vec![
            Entry::Field(FieldDescriptor::new("code", 0, 6, FieldKind::Text)),
            Entry::Field(FieldDescriptor::new("price", 6, 7, FieldKind::Unsigned)),
        ]
    }

    #[test]
    fn test_schema_length_is_sum_of_children() {
        let schema = RecordSchema::new("quote", quote_entries()).unwrap();
        assert_eq!(schema.length(), 13);
        assert_eq!(schema.name(), "quote");
        assert_eq!(schema.fields().count(), 2);
    }

    #[test]
    fn test_schema_rejects_overlap() {
        let entries = vec![
            Entry::Field(FieldDescriptor::new("code", 0, 6, FieldKind::Text)),
            Entry::Field(FieldDescriptor::new("price", 5, 7, FieldKind::Unsigned)),
        ];
        let err = RecordSchema::new("quote", entries).unwrap_err();
        match err {
            SchemaError::Conflict { first, second, .. } => {
                assert_eq!(first, "code");
                assert_eq!(second, "price");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_schema_rejects_gap_and_misorder() {
        let gap = vec![
            Entry::Field(FieldDescriptor::new("code", 0, 6, FieldKind::Text)),
            Entry::Field(FieldDescriptor::new("price", 8, 7, FieldKind::Unsigned)),
        ];
        assert!(matches!(
            RecordSchema::new("quote", gap),
            Err(SchemaError::Conflict { .. })
        ));

        let misordered = vec![
            Entry::Field(FieldDescriptor::new("price", 6, 7, FieldKind::Unsigned)),
            Entry::Field(FieldDescriptor::new("code", 0, 6, FieldKind::Text)),
        ];
        assert_eq!(
            RecordSchema::new("quote", misordered).unwrap_err(),
            SchemaError::Conflict {
                schema: "quote".to_string(),
                first: "price".to_string(),
                second: "code".to_string(),
                detail: "out of order: second starts at 0 before first at 6".to_string(),
            }
        );

        let swapped = vec![
            Entry::Field(FieldDescriptor::new("a", 0, 2, FieldKind::Text)),
            Entry::Field(FieldDescriptor::new("c", 4, 2, FieldKind::Text)),
            Entry::Field(FieldDescriptor::new("b", 2, 2, FieldKind::Text)),
        ];
        let err = RecordSchema::new("row", swapped).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Conflict { ref first, ref second, .. } if first == "c" && second == "b"
        ));
    }

    #[test]
    fn test_schema_rejects_overflowing_group() {
        let json = r#"{
            "name": "ticks",
            "entries": [
                {"entry": "group", "name": "rows", "count": 18446744073709551615, "schema": {
                    "name": "tick",
                    "entries": [{"entry": "field", "name": "qty", "length": 2, "kind": "signed"}]
                }}
            ]
        }"#;
        let err = RecordSchema::from_json(json).unwrap_err();
        assert!(err.to_string().contains("invalid entry 'rows'"));

        let row = SchemaBuilder::new("tick")
            .field("qty", 2, FieldKind::Signed)
            .build()
            .unwrap();
        let built = SchemaBuilder::new("ticks")
            .field("code", 6, FieldKind::Text)
            .group("rows", row, usize::MAX)
            .build();
        assert!(matches!(built, Err(SchemaError::InvalidEntry { .. })));
    }

    #[test]
    fn test_schema_rejects_duplicates_and_empty_entries() {
        let duplicate = vec![
            Entry::Field(FieldDescriptor::new("code", 0, 6, FieldKind::Text)),
            Entry::Field(FieldDescriptor::new("code", 6, 6, FieldKind::Text)),
        ];
        assert_eq!(
            RecordSchema::new("quote", duplicate).unwrap_err(),
            SchemaError::DuplicateName {
                schema: "quote".to_string(),
                name: "code".to_string(),
            }
        );

        let zero = vec![Entry::Field(FieldDescriptor::new("code", 0, 0, FieldKind::Text))];
        assert!(matches!(
            RecordSchema::new("quote", zero),
            Err(SchemaError::InvalidEntry { .. })
        ));
        assert!(RecordSchema::new("quote", Vec::new()).is_err());
    }

    #[test]
    fn test_schema_fillers_may_share_names() {
        let entries = vec![
            Entry::Filler(FillerDescriptor::new("reserved", 0, 2)),
            Entry::Field(FieldDescriptor::new("code", 2, 6, FieldKind::Text)),
            Entry::Filler(FillerDescriptor::new("reserved", 8, 2)),
        ];
        let schema = RecordSchema::new("padded", entries).unwrap();
        assert_eq!(schema.length(), 10);
        assert_eq!(schema.data_entries().count(), 1);
    }

    #[test]
    fn test_schema_rejects_wide_code_and_scale() {
        let wide = vec![Entry::Field(FieldDescriptor::new(
            "sign",
            0,
            1,
            FieldKind::code(["1", "22"]),
        ))];
        assert!(RecordSchema::new("s", wide).is_err());

        let scale = vec![Entry::Field(FieldDescriptor::new(
            "rate",
            0,
            5,
            FieldKind::fixed(29),
        ))];
        assert!(RecordSchema::new("s", scale).is_err());
    }

    #[test]
    fn test_expect_length() {
        let schema = RecordSchema::new("quote", quote_entries()).unwrap();
        assert_eq!(
            schema.clone().expect_length(12).unwrap_err(),
            SchemaError::LengthMismatch {
                schema: "quote".to_string(),
                declared: 12,
                computed: 13,
            }
        );
        assert!(schema.expect_length(13).is_ok());
    }

    #[test]
    fn test_sequential_assigns_offsets() {
        let entries = vec![
            Entry::Field(FieldDescriptor::new("code", 99, 6, FieldKind::Text)),
            Entry::Field(FieldDescriptor::new("price", 0, 7, FieldKind::Unsigned)),
        ];
        let schema = RecordSchema::sequential("quote", entries).unwrap();
        assert_eq!(schema.field("price").map(|f| f.offset), Some(6));
    }

    #[test]
    fn test_entry_at() {
        let schema = RecordSchema::new("quote", quote_entries()).unwrap();
        assert_eq!(schema.entry_at(0).map(Entry::name), Some("code"));
        assert_eq!(schema.entry_at(5).map(Entry::name), Some("code"));
        assert_eq!(schema.entry_at(6).map(Entry::name), Some("price"));
        assert_eq!(schema.entry_at(12).map(Entry::name), Some("price"));
        assert!(schema.entry_at(13).is_none());
    }

    #[test]
    fn test_json_round_trip_with_group() {
        let row = RecordSchema::new(
            "tick",
            vec![
                Entry::Field(FieldDescriptor::new("time", 0, 6, FieldKind::time("%H%M%S"))),
                Entry::Field(FieldDescriptor::new("qty", 6, 2, FieldKind::Signed)),
            ],
        )
        .unwrap();
        let schema = RecordSchema::new(
            "ticks",
            vec![
                Entry::Field(FieldDescriptor::new("code", 0, 6, FieldKind::Text)),
                Entry::Group(RepeatingGroupDescriptor::new("rows", 6, row, 20)),
            ],
        )
        .unwrap();
        assert_eq!(schema.length(), 166);

        let json = schema.to_json().unwrap();
        let back = RecordSchema::from_json(&json).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn test_json_without_offsets() {
        let json = r#"{
            "name": "quote",
            "length": 13,
            "entries": [
                {"entry": "field", "name": "code", "length": 6, "kind": "text"},
                {"entry": "field", "name": "price", "length": 7, "kind": "unsigned",
                 "padding": "space-left"}
            ]
        }"#;
        let schema = RecordSchema::from_json(json).unwrap();
        let price = schema.field("price").unwrap();
        assert_eq!(price.offset, 6);
        assert_eq!(price.padding, Padding::SpaceLeft);
    }

    #[test]
    fn test_json_rejects_declared_length_mismatch() {
        let json = r#"{
            "name": "quote",
            "length": 12,
            "entries": [
                {"entry": "field", "name": "code", "length": 6, "kind": "text"},
                {"entry": "field", "name": "price", "length": 7, "kind": "unsigned"}
            ]
        }"#;
        let err = RecordSchema::from_json(json).unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }
}
