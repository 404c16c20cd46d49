/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema builder for fluent schema construction.
//!
//! The builder computes offsets from widths so a schema can be described as
//! an ordered list of `(name, width, kind)` triples, the same shape the
//! venue's layout tables use.

use crate::field::{FieldDescriptor, FieldKind, FillerDescriptor, Padding};
use crate::group::{EmbeddedBlock, RepeatingGroupDescriptor};
use crate::record::{Entry, RecordSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use triowire_core::SchemaError;

/// Placement of the venue's per-field attribute byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeLayout {
    /// Fields are packed back to back.
    #[default]
    Packed,
    /// Every data field is followed by a one-byte attribute slot.
    TrailingAttribute,
}

impl fmt::Display for AttributeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packed => write!(f, "packed"),
            Self::TrailingAttribute => write!(f, "trailing-attribute"),
        }
    }
}

impl FromStr for AttributeLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "packed" => Ok(Self::Packed),
            "trailing-attribute" => Ok(Self::TrailingAttribute),
            _ => Err(format!("unknown attribute layout '{}'", s)),
        }
    }
}

/// Builder for a [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    /// Schema name.
    name: String,
    /// Attribute slot placement.
    layout: AttributeLayout,
    /// Entries added so far.
    entries: Vec<Entry>,
    /// Next free offset.
    offset: usize,
    /// Expected total length, if declared.
    declared_length: Option<usize>,
}

impl SchemaBuilder {
    /// Creates a new builder for a packed schema.
    ///
    /// # Arguments
    /// * `name` - The schema name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: AttributeLayout::Packed,
            entries: Vec::new(),
            offset: 0,
            declared_length: None,
        }
    }

    /// Sets the attribute slot placement for fields added afterwards.
    #[must_use]
    pub const fn with_layout(mut self, layout: AttributeLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Declares the expected total length, checked by [`build`](Self::build).
    #[must_use]
    pub const fn declared_length(mut self, length: usize) -> Self {
        self.declared_length = Some(length);
        self
    }

    /// Appends a field with the kind's default padding.
    ///
    /// # Arguments
    /// * `name` - The field name
    /// * `width` - Data width in bytes, excluding any attribute slot
    /// * `kind` - The semantic kind
    #[must_use]
    pub fn field(self, name: impl Into<String>, width: usize, kind: FieldKind) -> Self {
        let padding = kind.default_padding();
        self.padded_field(name, width, kind, padding)
    }

    /// Appends a field with explicit padding.
    #[must_use]
    pub fn padded_field(
        mut self,
        name: impl Into<String>,
        width: usize,
        kind: FieldKind,
        padding: Padding,
    ) -> Self {
        let name = name.into();
        let attribute = match self.layout {
            AttributeLayout::TrailingAttribute => Some(format!("_{}", name)),
            AttributeLayout::Packed => None,
        };
        let field = FieldDescriptor::new(name, self.offset, width, kind).with_padding(padding);
        self.push(Entry::Field(field));
        if let Some(attribute) = attribute {
            self.push(Entry::Filler(FillerDescriptor::new(attribute, self.offset, 1)));
        }
        self
    }

    /// Appends reserved bytes.
    #[must_use]
    pub fn filler(mut self, name: impl Into<String>, width: usize) -> Self {
        let filler = FillerDescriptor::new(name, self.offset, width);
        self.push(Entry::Filler(filler));
        self
    }

    /// Appends a fixed-count repeating group.
    ///
    /// # Arguments
    /// * `name` - The group name
    /// * `schema` - Layout of one element
    /// * `count` - Number of elements
    #[must_use]
    pub fn group(mut self, name: impl Into<String>, schema: RecordSchema, count: usize) -> Self {
        let group = RepeatingGroupDescriptor::new(name, self.offset, schema, count);
        self.push(Entry::Group(group));
        self
    }

    /// Appends a block embedded once.
    #[must_use]
    pub fn block(mut self, name: impl Into<String>, schema: RecordSchema) -> Self {
        let block = EmbeddedBlock::new(name, self.offset, schema);
        self.push(Entry::Block(block));
        self
    }

    /// Returns the next free offset.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Builds and validates the schema.
    ///
    /// # Errors
    /// Returns a `SchemaError` if an entry is invalid, names collide, or the
    /// declared length differs from the computed one.
    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        let schema = RecordSchema::new(self.name, self.entries)?;
        match self.declared_length {
            Some(declared) => schema.expect_length(declared),
            None => Ok(schema),
        }
    }

    fn push(&mut self, entry: Entry) {
        self.offset = self.offset.saturating_add(entry.length());
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_packed_offsets() {
        let schema = SchemaBuilder::new("quote")
            .field("code", 6, FieldKind::Text)
            .field("price", 7, FieldKind::Unsigned)
            .build()
            .unwrap();
        assert_eq!(schema.length(), 13);
        assert_eq!(schema.field("price").unwrap().offset, 6);
    }

    #[test]
    fn test_builder_trailing_attribute_slots() {
        let schema = SchemaBuilder::new("c1101InBlock")
            .with_layout(AttributeLayout::TrailingAttribute)
            .field("formlang", 1, FieldKind::any_code())
            .field("code", 6, FieldKind::Text)
            .build()
            .unwrap();

        assert_eq!(schema.length(), 9);
        let names: Vec<_> = schema.entries().iter().map(Entry::name).collect();
        assert_eq!(names, vec!["formlang", "_formlang", "code", "_code"]);
        assert_eq!(schema.field("code").unwrap().offset, 2);
    }

    #[test]
    fn test_builder_group_and_block() {
        let row = SchemaBuilder::new("row")
            .field("time", 6, FieldKind::Text)
            .field("qty", 2, FieldKind::Signed)
            .build()
            .unwrap();
        let schema = SchemaBuilder::new("composite")
            .block("header", row.clone())
            .group("rows", row, 20)
            .filler("reserved", 2)
            .declared_length(170)
            .build()
            .unwrap();
        assert_eq!(schema.length(), 170);
        assert_eq!(schema.entry("rows").map(Entry::offset), Some(8));
    }

    #[test]
    fn test_builder_declared_length_mismatch() {
        let err = SchemaBuilder::new("quote")
            .field("code", 6, FieldKind::Text)
            .declared_length(7)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::LengthMismatch { computed: 6, .. }));
    }

    #[test]
    fn test_attribute_layout_from_str() {
        assert_eq!(
            "trailing-attribute".parse::<AttributeLayout>().unwrap(),
            AttributeLayout::TrailingAttribute
        );
        assert!("dense".parse::<AttributeLayout>().is_err());
    }
}
