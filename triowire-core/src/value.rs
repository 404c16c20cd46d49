/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Decoded values and records.
//!
//! This module provides:
//! - [`FieldValue`]: The decoded content of one scalar field
//! - [`Value`]: A scalar, a repeating group, or an embedded block
//! - [`DecodedRecord`]: Ordered name-to-value mapping produced by a decode

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Decoded content of a single fixed-width field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text or enumerated code, trailing padding removed.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Fixed-point or explicit decimal number.
    Decimal(Decimal),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Blank numeric, date, or time field.
    Empty,
    /// Raw content kept when a malformed field is substituted instead of rejected.
    Unparsed(String),
}

impl FieldValue {
    /// Returns the value as a string slice, if it is a Text variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an Int variant.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a u64, if it is a UInt variant.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a Decimal, if it is a Decimal variant.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a date, if it is a Date variant.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a time of day, if it is a Time variant.
    #[must_use]
    pub const fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns true for the Empty variant.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true for the Unparsed variant.
    #[must_use]
    pub const fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Date(d) => write!(f, "{}", d),
            Self::Time(t) => write!(f, "{}", t),
            Self::Empty => Ok(()),
            Self::Unparsed(raw) => write!(f, "<unparsed {:?}>", raw),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

/// A decoded schema entry: scalar field, repeating group, or embedded block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Scalar field content.
    Field(FieldValue),
    /// Fixed-count repeating group, always exactly `count` elements long.
    Group(Vec<DecodedRecord>),
    /// Block embedded once inside a composite record.
    Record(DecodedRecord),
}

impl Value {
    /// Returns the scalar content, if this is a Field.
    #[must_use]
    pub const fn as_field(&self) -> Option<&FieldValue> {
        match self {
            Self::Field(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the group elements, if this is a Group.
    #[must_use]
    pub fn as_group(&self) -> Option<&[DecodedRecord]> {
        match self {
            Self::Group(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the embedded record, if this is a Record.
    #[must_use]
    pub const fn as_record(&self) -> Option<&DecodedRecord> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }
}

impl From<FieldValue> for Value {
    fn from(v: FieldValue) -> Self {
        Self::Field(v)
    }
}

macro_rules! impl_value_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Field(FieldValue::from(v))
                }
            }
        )*
    };
}

impl_value_from_scalar!(&str, String, i64, u64, Decimal, NaiveDate, NaiveTime);

impl From<Vec<DecodedRecord>> for Value {
    fn from(v: Vec<DecodedRecord>) -> Self {
        Self::Group(v)
    }
}

impl From<DecodedRecord> for Value {
    fn from(v: DecodedRecord) -> Self {
        Self::Record(v)
    }
}

/// Ordered mapping from entry name to decoded value.
///
/// Entries keep the order of the schema that produced them. Lookups are by
/// name; inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecord {
    entries: Vec<(String, Value)>,
}

impl DecodedRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty record with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces an entry.
    ///
    /// # Arguments
    /// * `name` - The entry name
    /// * `value` - The entry value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Gets an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Gets a scalar field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).and_then(Value::as_field)
    }

    /// Gets a repeating group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&[DecodedRecord]> {
        self.get(name).and_then(Value::as_group)
    }

    /// Gets an embedded block by name.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&DecodedRecord> {
        self.get(name).and_then(Value::as_record)
    }

    /// Returns an iterator over entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns an iterator over entry names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the record has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the record into a JSON object.
    ///
    /// # Errors
    /// Returns `serde_json::Error` if a value cannot be represented in JSON.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for DecodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a DecodedRecord {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_insert_keeps_order_and_replaces() {
        let mut record = DecodedRecord::new();
        record.insert("code", "005930");
        record.insert("price", 1234567_u64);
        record.insert("code", "000660");

        let names: Vec<_> = record.names().collect();
        assert_eq!(names, vec!["code", "price"]);
        assert_eq!(record.field("code").and_then(FieldValue::as_str), Some("000660"));
        assert_eq!(record.field("price").and_then(FieldValue::as_u64), Some(1234567));
    }

    #[test]
    fn test_record_group_and_block_access() {
        let row = DecodedRecord::new().with("time", "09:00:01");
        let inner = DecodedRecord::new().with("dongsi", "1");
        let record = DecodedRecord::new()
            .with("rows", vec![row.clone(), row])
            .with("indicator", inner);

        assert_eq!(record.group("rows").map(<[DecodedRecord]>::len), Some(2));
        assert!(record.record("indicator").is_some());
        assert!(record.field("rows").is_none());
    }

    #[test]
    fn test_record_to_json() {
        let record = DecodedRecord::new()
            .with("code", "005930")
            .with("volume", -42_i64)
            .with("chrate", Decimal::from_str("1.25").unwrap())
            .with("listdate", FieldValue::Empty);

        let json = record.to_json().unwrap();
        assert_eq!(json["code"], "005930");
        assert_eq!(json["volume"], -42);
        assert_eq!(json["chrate"], "1.25");
        assert!(json["listdate"].is_null());
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from("abc").to_string(), "abc");
        assert_eq!(FieldValue::Int(-7).to_string(), "-7");
        assert_eq!(FieldValue::Empty.to_string(), "");
        assert!(FieldValue::Unparsed("1x".to_string()).is_unparsed());
    }
}
