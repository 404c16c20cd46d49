/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Scalar field parsing and formatting.
//!
//! Parsing turns the bytes of one field into a [`FieldValue`] according to
//! the field's kind. Formatting produces the unpadded representation of a
//! value; padding to the field width is applied by [`pad_into`].

use crate::text::{TextEncoding, trim_end_spaces, trim_spaces, trim_start_spaces, until_nul};
use bytes::{BufMut, BytesMut};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::fmt::Write;
use std::str::FromStr;
use triowire_core::{EncodeError, FieldValue};
use triowire_schema::{FieldDescriptor, FieldKind, Padding};

/// Unpadded representation of a value, usually short enough to stay inline.
pub type Repr = SmallVec<[u8; 32]>;

/// Parses the bytes of one field.
///
/// # Arguments
/// * `field` - The field descriptor
/// * `bytes` - Exactly `field.length` bytes
/// * `encoding` - Encoding of text and code fields
///
/// # Errors
/// Returns the reason the content does not match the field's kind.
pub fn parse_value(
    field: &FieldDescriptor,
    bytes: &[u8],
    encoding: TextEncoding,
) -> Result<FieldValue, String> {
    let content = until_nul(bytes);

    match &field.kind {
        FieldKind::Text => {
            let text = match field.padding {
                Padding::SpaceRight => trim_end_spaces(content),
                Padding::SpaceLeft => trim_start_spaces(content),
                Padding::ZeroLeft => content,
            };
            Ok(FieldValue::Text(encoding.decode(text)?.into_owned()))
        }
        FieldKind::Code { codes } => {
            let code = encoding.decode(trim_spaces(content))?;
            if !code.is_empty() && !codes.is_empty() && !codes.iter().any(|c| *c == code) {
                return Err(format!("unknown code '{}'", code));
            }
            Ok(FieldValue::Text(code.into_owned()))
        }
        kind => {
            let trimmed = trim_spaces(content);
            if trimmed.is_empty() {
                return Ok(FieldValue::Empty);
            }
            let s = std::str::from_utf8(trimmed).map_err(|_| "non-ASCII byte".to_string())?;
            parse_str(kind, s)
        }
    }
}

fn parse_str(kind: &FieldKind, s: &str) -> Result<FieldValue, String> {
    match kind {
        FieldKind::Unsigned => {
            if !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("'{}' is not an unsigned integer", s));
            }
            s.parse()
                .map(FieldValue::UInt)
                .map_err(|_| format!("'{}' overflows an unsigned integer", s))
        }
        FieldKind::Signed => parse_signed(s).map(FieldValue::Int),
        FieldKind::Fixed { scale } => {
            if s.contains('.') {
                return parse_decimal(s).map(FieldValue::Decimal);
            }
            let mantissa = parse_signed(s)?;
            Decimal::try_new(mantissa, *scale)
                .map(FieldValue::Decimal)
                .map_err(|e| format!("'{}' with scale {}: {}", s, scale, e))
        }
        FieldKind::Decimal => parse_decimal(s).map(FieldValue::Decimal),
        FieldKind::Date { format } => {
            if s.bytes().all(|b| b == b'0') {
                return Ok(FieldValue::Empty);
            }
            NaiveDate::parse_from_str(s, format)
                .map(FieldValue::Date)
                .map_err(|e| format!("'{}' is not a date in format '{}': {}", s, format, e))
        }
        FieldKind::Time { format } => NaiveTime::parse_from_str(s, format)
            .map(FieldValue::Time)
            .map_err(|e| format!("'{}' is not a time in format '{}': {}", s, format, e)),
        FieldKind::Text | FieldKind::Code { .. } => Ok(FieldValue::Text(s.to_string())),
    }
}

fn parse_signed(s: &str) -> Result<i64, String> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a signed integer", s));
    }
    s.parse()
        .map_err(|_| format!("'{}' overflows a signed integer", s))
}

fn parse_decimal(s: &str) -> Result<Decimal, String> {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let well_formed = !unsigned.is_empty()
        && unsigned.bytes().filter(|&b| b == b'.').count() <= 1
        && unsigned.bytes().any(|b| b.is_ascii_digit())
        && unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'.');
    if !well_formed {
        return Err(format!("'{}' is not a decimal number", s));
    }
    Decimal::from_str(s).map_err(|e| format!("'{}': {}", s, e))
}

/// Produces the unpadded representation of a value for a field.
///
/// Returns `None` for values that encode as a blank field.
///
/// # Errors
/// Returns `EncodeError::InvalidValue` if the value cannot be represented by
/// the field's kind.
pub fn format_value(
    field: &FieldDescriptor,
    value: &FieldValue,
    encoding: TextEncoding,
) -> Result<Option<Repr>, EncodeError> {
    let invalid = |reason: String| EncodeError::InvalidValue {
        field: field.name.clone(),
        reason,
    };
    let mismatch = || {
        invalid(format!(
            "{} value cannot be written to a {} field",
            variant_name(value),
            field.kind
        ))
    };

    let repr: Repr = match (value, &field.kind) {
        (FieldValue::Empty, _) => return Ok(None),
        (FieldValue::Unparsed(raw), _) => Repr::from_slice(&encoding.encode(raw).map_err(invalid)?),

        (FieldValue::UInt(v), FieldKind::Unsigned | FieldKind::Signed) => itoa_repr(*v),
        (FieldValue::Int(v), FieldKind::Unsigned) if *v >= 0 => itoa_repr(*v),
        (FieldValue::Int(v), FieldKind::Unsigned) => {
            return Err(invalid(format!("negative value {} for an unsigned field", v)));
        }
        (FieldValue::Int(v), FieldKind::Signed) => itoa_repr(*v),

        (FieldValue::Int(v), FieldKind::Fixed { scale }) => {
            fixed_repr(Decimal::from(*v), *scale).map_err(invalid)?
        }
        (FieldValue::UInt(v), FieldKind::Fixed { scale }) => {
            fixed_repr(Decimal::from(*v), *scale).map_err(invalid)?
        }
        (FieldValue::Decimal(d), FieldKind::Fixed { scale }) => {
            fixed_repr(*d, *scale).map_err(invalid)?
        }

        (FieldValue::Int(v), FieldKind::Decimal) => itoa_repr(*v),
        (FieldValue::UInt(v), FieldKind::Decimal) => itoa_repr(*v),
        (FieldValue::Decimal(d), FieldKind::Decimal) => {
            let mut out = Repr::new();
            write_display(&mut out, d).map_err(invalid)?;
            out
        }

        (FieldValue::Text(s), FieldKind::Text) => {
            Repr::from_slice(&encoding.encode(s).map_err(invalid)?)
        }
        (FieldValue::Text(s), FieldKind::Code { codes }) => {
            if !s.is_empty() && !codes.is_empty() && !codes.iter().any(|c| c == s) {
                return Err(invalid(format!("unknown code '{}'", s)));
            }
            Repr::from_slice(&encoding.encode(s).map_err(invalid)?)
        }

        (FieldValue::Date(d), FieldKind::Date { format }) => {
            let mut out = Repr::new();
            write_display(&mut out, &d.format(format)).map_err(invalid)?;
            out
        }
        (FieldValue::Time(t), FieldKind::Time { format }) => {
            let mut out = Repr::new();
            write_display(&mut out, &t.format(format)).map_err(invalid)?;
            out
        }

        _ => return Err(mismatch()),
    };

    if repr.is_empty() {
        return Ok(None);
    }
    Ok(Some(repr))
}

/// Writes a representation into `out`, padded to the field width.
///
/// # Errors
/// Returns `EncodeError::ValueTooWide` if the representation exceeds the
/// field width.
pub fn pad_into(
    field: &FieldDescriptor,
    repr: Option<&[u8]>,
    out: &mut BytesMut,
) -> Result<(), EncodeError> {
    let width = field.length;
    let Some(repr) = repr else {
        out.put_bytes(b' ', width);
        return Ok(());
    };
    if repr.len() > width {
        return Err(EncodeError::ValueTooWide {
            field: field.name.clone(),
            width,
            actual: repr.len(),
        });
    }

    let fill = width - repr.len();
    match field.padding {
        Padding::ZeroLeft => {
            let (sign, digits) = match repr.split_first() {
                Some((&sign @ (b'-' | b'+'), rest)) if field.kind.is_numeric() => {
                    (Some(sign), rest)
                }
                _ => (None, repr),
            };
            if let Some(sign) = sign {
                out.put_u8(sign);
            }
            out.put_bytes(b'0', fill);
            out.put_slice(digits);
        }
        Padding::SpaceLeft => {
            out.put_bytes(b' ', fill);
            out.put_slice(repr);
        }
        Padding::SpaceRight => {
            out.put_slice(repr);
            out.put_bytes(b' ', fill);
        }
    }
    Ok(())
}

fn itoa_repr<I: itoa::Integer>(value: I) -> Repr {
    let mut buf = itoa::Buffer::new();
    Repr::from_slice(buf.format(value).as_bytes())
}

fn fixed_repr(value: Decimal, scale: u32) -> Result<Repr, String> {
    let normalized = value.normalize();
    if normalized.scale() > scale {
        return Err(format!(
            "{} has more than {} fractional digits",
            value, scale
        ));
    }
    let mut scaled = normalized;
    scaled.rescale(scale);
    if scaled.scale() != scale {
        return Err(format!("{} cannot be scaled to {} digits", value, scale));
    }
    let mut buf = itoa::Buffer::new();
    Ok(Repr::from_slice(buf.format(scaled.mantissa()).as_bytes()))
}

fn write_display(out: &mut Repr, value: &impl std::fmt::Display) -> Result<(), String> {
    let mut s = String::new();
    write!(s, "{}", value).map_err(|_| "value cannot be formatted".to_string())?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

const fn variant_name(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Text(_) => "text",
        FieldValue::Int(_) => "signed integer",
        FieldValue::UInt(_) => "unsigned integer",
        FieldValue::Decimal(_) => "decimal",
        FieldValue::Date(_) => "date",
        FieldValue::Time(_) => "time",
        FieldValue::Empty => "empty",
        FieldValue::Unparsed(_) => "unparsed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind, width: usize) -> FieldDescriptor {
        FieldDescriptor::new("f", 0, width, kind)
    }

    fn parse_ok(kind: FieldKind, text: &str) -> FieldValue {
        let f = field(kind, text.len());
        parse_value(&f, text.as_bytes(), TextEncoding::Cp949).unwrap()
    }

    fn encode(f: &FieldDescriptor, value: FieldValue) -> Result<String, EncodeError> {
        let repr = format_value(f, &value, TextEncoding::Cp949)?;
        let mut out = BytesMut::new();
        pad_into(f, repr.as_deref(), &mut out)?;
        Ok(String::from_utf8(out.to_vec()).unwrap())
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_ok(FieldKind::Unsigned, "0001234"), FieldValue::UInt(1234));
        assert_eq!(parse_ok(FieldKind::Signed, "-000123"), FieldValue::Int(-123));
        assert_eq!(parse_ok(FieldKind::Signed, "+000123"), FieldValue::Int(123));
        assert_eq!(parse_ok(FieldKind::Signed, "   42"), FieldValue::Int(42));
        assert_eq!(
            parse_ok(FieldKind::fixed(2), "00123"),
            FieldValue::Decimal(Decimal::new(123, 2))
        );
        assert_eq!(
            parse_ok(FieldKind::fixed(2), "-1.25"),
            FieldValue::Decimal(Decimal::new(-125, 2))
        );
        assert_eq!(
            parse_ok(FieldKind::Decimal, "-001.23"),
            FieldValue::Decimal(Decimal::new(-123, 2))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_numbers() {
        let f = field(FieldKind::Unsigned, 4);
        assert!(parse_value(&f, b"12a4", TextEncoding::Cp949).is_err());
        assert!(parse_value(&f, b"-123", TextEncoding::Cp949).is_err());

        let f = field(FieldKind::Signed, 4);
        assert!(parse_value(&f, b"--12", TextEncoding::Cp949).is_err());
        assert!(parse_value(&f, b"   -", TextEncoding::Cp949).is_err());

        let f = field(FieldKind::Unsigned, 21);
        assert!(parse_value(&f, b"999999999999999999999", TextEncoding::Cp949).is_err());

        let f = field(FieldKind::Decimal, 5);
        assert!(parse_value(&f, b"1.2.3", TextEncoding::Cp949).is_err());
        assert!(parse_value(&f, b"1e5  ", TextEncoding::Cp949).is_err());
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(parse_ok(FieldKind::Signed, "     "), FieldValue::Empty);
        assert_eq!(parse_ok(FieldKind::date("%Y%m%d"), "        "), FieldValue::Empty);
        assert_eq!(parse_ok(FieldKind::date("%Y%m%d"), "00000000"), FieldValue::Empty);
        assert_eq!(parse_ok(FieldKind::Text, "    "), FieldValue::Text(String::new()));
        assert_eq!(parse_ok(FieldKind::any_code(), " "), FieldValue::Text(String::new()));

        let f = field(FieldKind::Unsigned, 4);
        assert_eq!(parse_value(&f, b"\0\0\0\0", TextEncoding::Cp949).unwrap(), FieldValue::Empty);
    }

    #[test]
    fn test_parse_text_and_codes() {
        assert_eq!(parse_ok(FieldKind::Text, "KOSPI  "), FieldValue::from("KOSPI"));

        let f = field(FieldKind::Text, 6);
        assert_eq!(
            parse_value(&f, b"ab\0xyz", TextEncoding::Cp949).unwrap(),
            FieldValue::from("ab")
        );

        let f = field(FieldKind::code(["1", "2"]), 1);
        assert_eq!(parse_value(&f, b"2", TextEncoding::Cp949).unwrap(), FieldValue::from("2"));
        assert!(parse_value(&f, b"9", TextEncoding::Cp949).is_err());
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_ok(FieldKind::date("%Y%m%d"), "20240131"),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert_eq!(
            parse_ok(FieldKind::time("%H%M%S"), "093001"),
            FieldValue::Time(NaiveTime::from_hms_opt(9, 30, 1).unwrap())
        );
        let f = field(FieldKind::date("%Y%m%d"), 8);
        assert!(parse_value(&f, b"20241341", TextEncoding::Cp949).is_err());
    }

    #[test]
    fn test_format_padding() {
        let signed = field(FieldKind::Signed, 7);
        assert_eq!(encode(&signed, FieldValue::Int(-123)).unwrap(), "-000123");
        assert_eq!(encode(&signed, FieldValue::Int(123)).unwrap(), "0000123");

        let spaced = field(FieldKind::Unsigned, 5).with_padding(Padding::SpaceLeft);
        assert_eq!(encode(&spaced, FieldValue::UInt(42)).unwrap(), "   42");

        let text = field(FieldKind::Text, 6);
        assert_eq!(encode(&text, FieldValue::from("ab")).unwrap(), "ab    ");
        assert_eq!(encode(&text, FieldValue::Empty).unwrap(), "      ");
    }

    #[test]
    fn test_format_fixed() {
        let rate = field(FieldKind::fixed(2), 5);
        assert_eq!(
            encode(&rate, FieldValue::Decimal(Decimal::new(123, 2))).unwrap(),
            "00123"
        );
        assert_eq!(
            encode(&rate, FieldValue::Decimal(Decimal::new(-15, 1))).unwrap(),
            "-0150"
        );
        assert_eq!(encode(&rate, FieldValue::Int(7)).unwrap(), "00700");
        assert!(matches!(
            encode(&rate, FieldValue::Decimal(Decimal::new(1234, 3))),
            Err(EncodeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_format_errors() {
        let price = field(FieldKind::Unsigned, 3);
        assert_eq!(
            encode(&price, FieldValue::UInt(12345)).unwrap_err(),
            EncodeError::ValueTooWide {
                field: "f".to_string(),
                width: 3,
                actual: 5,
            }
        );
        assert!(matches!(
            encode(&price, FieldValue::from("abc")),
            Err(EncodeError::InvalidValue { .. })
        ));
        assert!(matches!(
            encode(&price, FieldValue::Int(-1)),
            Err(EncodeError::InvalidValue { .. })
        ));

        let code = field(FieldKind::code(["Y", "N"]), 1);
        assert!(encode(&code, FieldValue::from("X")).is_err());
    }

    #[test]
    fn test_format_unparsed_writes_raw_text() {
        let price = field(FieldKind::Unsigned, 5);
        assert_eq!(
            encode(&price, FieldValue::Unparsed("12x".to_string())).unwrap(),
            "0012x"
        );
    }

    #[test]
    fn test_format_cp949_width_counts_bytes() {
        let name = field(FieldKind::Text, 6);
        assert!(matches!(
            encode(&name, FieldValue::from("삼성전자")),
            Err(EncodeError::ValueTooWide { actual: 8, .. })
        ));
    }
}
