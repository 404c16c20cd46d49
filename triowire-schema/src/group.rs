/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Nested record descriptors.
//!
//! - [`RepeatingGroupDescriptor`]: A sub-record repeated a fixed number of times
//! - [`EmbeddedBlock`]: A sub-record that appears exactly once

use crate::record::RecordSchema;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Fixed-count repeating group.
///
/// The venue always transmits every slot of a group, so the count is a
/// schema-time constant and unused trailing slots arrive blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingGroupDescriptor {
    /// Group name, unique within its schema.
    pub name: String,
    /// Byte offset of the first element within the owning record.
    pub offset: usize,
    /// Number of elements.
    pub count: usize,
    /// Layout of one element.
    pub schema: RecordSchema,
}

impl RepeatingGroupDescriptor {
    /// Creates a new repeating group descriptor.
    ///
    /// # Arguments
    /// * `name` - The group name
    /// * `offset` - Byte offset within the owning record
    /// * `schema` - Layout of one element
    /// * `count` - Number of elements
    #[must_use]
    pub fn new(name: impl Into<String>, offset: usize, schema: RecordSchema, count: usize) -> Self {
        Self {
            name: name.into(),
            offset,
            count,
            schema,
        }
    }

    /// Returns the width of one element.
    #[inline]
    #[must_use]
    pub const fn element_length(&self) -> usize {
        self.schema.length()
    }

    /// Returns the total width of all elements, saturating on overflow.
    #[inline]
    #[must_use]
    pub const fn length(&self) -> usize {
        self.count.saturating_mul(self.schema.length())
    }

    /// Returns the total width of all elements, or `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_length(&self) -> Option<usize> {
        self.count.checked_mul(self.schema.length())
    }

    /// Returns the byte range occupied by the group.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.length())
    }

    /// Returns the byte range of one element, relative to the group start.
    ///
    /// # Arguments
    /// * `index` - Zero-based element index
    #[must_use]
    pub const fn element_range(&self, index: usize) -> Range<usize> {
        let start = index * self.element_length();
        start..start + self.element_length()
    }
}

/// Sub-record embedded once inside a composite record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedBlock {
    /// Entry name, unique within its schema.
    pub name: String,
    /// Byte offset within the owning record.
    pub offset: usize,
    /// Layout of the block.
    pub schema: RecordSchema,
}

impl EmbeddedBlock {
    /// Creates a new embedded block descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, offset: usize, schema: RecordSchema) -> Self {
        Self {
            name: name.into(),
            offset,
            schema,
        }
    }

    /// Returns the width of the block.
    #[inline]
    #[must_use]
    pub const fn length(&self) -> usize {
        self.schema.length()
    }

    /// Returns the byte range occupied by the block.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDescriptor, FieldKind};
    use crate::record::Entry;

    fn tick() -> RecordSchema {
        RecordSchema::new(
            "tick",
            vec![
                Entry::Field(FieldDescriptor::new("time", 0, 6, FieldKind::Text)),
                Entry::Field(FieldDescriptor::new("qty", 6, 2, FieldKind::Signed)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_group_geometry() {
        let group = RepeatingGroupDescriptor::new("rows", 10, tick(), 20);
        assert_eq!(group.element_length(), 8);
        assert_eq!(group.length(), 160);
        assert_eq!(group.range(), 10..170);
        assert_eq!(group.element_range(3), 24..32);
    }

    #[test]
    fn test_embedded_block_geometry() {
        let block = EmbeddedBlock::new("indicator", 4, tick());
        assert_eq!(block.length(), 8);
        assert_eq!(block.range(), 4..12);
    }
}
