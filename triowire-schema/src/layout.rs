/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Tabular layout format.
//!
//! Layout text describes blocks and the composite messages built from them,
//! one entry per line:
//!
//! ```text
//! # comment
//! layout trailing-attribute        # every field followed by 1 attribute byte
//! block c1101InBlock
//!   formlang   1  code
//!   code       6  text
//! end
//! message c1101
//!   block c1101InBlock
//!   group c1101OutBlock2 20
//! end
//! ```
//!
//! A body line whose second token is a number is a field: `NAME WIDTH KIND`,
//! optionally followed by `pad=zero-left|space-left|space-right`. Other body
//! lines are directives:
//! - `block NAME [as ALIAS]`: embed a previously declared block once
//! - `group NAME COUNT [as ALIAS]`: embed a declared block `COUNT` times
//! - `filler NAME WIDTH`: reserved bytes
//!
//! `block` and `message` headers accept an optional `length N` suffix that is
//! checked against the computed length.

use crate::builder::{AttributeLayout, SchemaBuilder};
use crate::field::{FieldKind, Padding};
use crate::record::RecordSchema;
use std::collections::HashMap;
use tracing::debug;
use triowire_core::SchemaError;

/// Parsed layout document.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Blocks in declaration order.
    blocks: Vec<RecordSchema>,
    /// Composite messages in declaration order.
    messages: Vec<RecordSchema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Block,
    Message,
}

impl SectionKind {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Message => "message",
        }
    }
}

struct Section {
    kind: SectionKind,
    name: String,
    line: usize,
    builder: SchemaBuilder,
}

impl Layout {
    /// Parses layout text.
    ///
    /// # Arguments
    /// * `text` - The layout document
    ///
    /// # Errors
    /// Returns `SchemaError::Parse` for malformed lines,
    /// `SchemaError::UnknownBlock` for references to undeclared blocks, and
    /// any error raised while validating a completed block or message.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let mut layout = Self::default();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut messages: HashMap<String, usize> = HashMap::new();
        let mut mode = AttributeLayout::Packed;
        let mut open: Option<Section> = None;

        for (number, raw) in text.lines().enumerate() {
            let line = number + 1;
            let content = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let Some(&head) = tokens.first() else {
                continue;
            };

            let Some(mut section) = open.take() else {
                match head {
                    "layout" => {
                        let [_, value] = tokens[..] else {
                            return Err(parse_error(line, "expected 'layout MODE'"));
                        };
                        mode = value.parse().map_err(|e: String| parse_error(line, &e))?;
                    }
                    "block" | "message" => {
                        let kind = if head == "block" {
                            SectionKind::Block
                        } else {
                            SectionKind::Message
                        };
                        open = Some(open_section(kind, &tokens, line, mode)?);
                    }
                    other => {
                        return Err(parse_error(
                            line,
                            &format!("unexpected '{}' outside a block or message", other),
                        ));
                    }
                }
                continue;
            };

            if head == "end" {
                if tokens.len() != 1 {
                    return Err(parse_error(line, "unexpected tokens after 'end'"));
                }
                let schema = section.builder.build()?;
                debug!(
                    "layout: {} {} is {} bytes",
                    section.kind.keyword(),
                    schema.name(),
                    schema.length()
                );
                let (table, names) = match section.kind {
                    SectionKind::Block => (&mut layout.blocks, &mut index),
                    SectionKind::Message => (&mut layout.messages, &mut messages),
                };
                if names.contains_key(&section.name) {
                    return Err(parse_error(
                        section.line,
                        &format!("{} '{}' is declared twice", section.kind.keyword(), section.name),
                    ));
                }
                names.insert(section.name, table.len());
                table.push(schema);
                continue;
            }

            let is_field_line = tokens.get(1).is_some_and(|t| t.parse::<usize>().is_ok());
            section.builder = if is_field_line {
                parse_field(section.builder, &tokens, line)?
            } else {
                match head {
                    "block" => {
                        let (name, alias) = match tokens[..] {
                            [_, name] => (name, name),
                            [_, name, "as", alias] => (name, alias),
                            _ => {
                                return Err(parse_error(line, "expected 'block NAME [as ALIAS]'"));
                            }
                        };
                        let schema = lookup(&layout.blocks, &index, name, line)?;
                        section.builder.block(alias, schema)
                    }
                    "group" => {
                        let (name, count, alias) = match tokens[..] {
                            [_, name, count] => (name, count, name),
                            [_, name, count, "as", alias] => (name, count, alias),
                            _ => {
                                return Err(parse_error(
                                    line,
                                    "expected 'group NAME COUNT [as ALIAS]'",
                                ));
                            }
                        };
                        let count = parse_number(count, line, "repetition count")?;
                        let schema = lookup(&layout.blocks, &index, name, line)?;
                        section.builder.group(alias, schema, count)
                    }
                    "filler" => {
                        let [_, name, width] = tokens[..] else {
                            return Err(parse_error(line, "expected 'filler NAME WIDTH'"));
                        };
                        let width = parse_number(width, line, "width")?;
                        section.builder.filler(name, width)
                    }
                    other => {
                        return Err(parse_error(
                            line,
                            &format!(
                                "unexpected '{}' inside {} {}",
                                other,
                                section.kind.keyword(),
                                section.name
                            ),
                        ));
                    }
                }
            };
            open = Some(section);
        }

        if let Some(section) = open {
            return Err(parse_error(
                section.line,
                &format!(
                    "{} '{}' is not terminated by 'end'",
                    section.kind.keyword(),
                    section.name
                ),
            ));
        }

        debug!(
            "layout: parsed {} blocks and {} messages",
            layout.blocks.len(),
            layout.messages.len()
        );
        Ok(layout)
    }

    /// Returns the blocks in declaration order.
    #[must_use]
    pub fn blocks(&self) -> &[RecordSchema] {
        &self.blocks
    }

    /// Returns the composite messages in declaration order.
    #[must_use]
    pub fn messages(&self) -> &[RecordSchema] {
        &self.messages
    }

    /// Gets a block by name.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&RecordSchema> {
        self.blocks.iter().find(|s| s.name() == name)
    }

    /// Gets a composite message by name.
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&RecordSchema> {
        self.messages.iter().find(|s| s.name() == name)
    }

    /// Returns every schema, blocks first.
    pub fn schemas(&self) -> impl Iterator<Item = &RecordSchema> {
        self.blocks.iter().chain(self.messages.iter())
    }
}

fn open_section(
    kind: SectionKind,
    tokens: &[&str],
    line: usize,
    mode: AttributeLayout,
) -> Result<Section, SchemaError> {
    let (name, declared) = match tokens {
        [_, name] => (*name, None),
        [_, name, "length", length] => (*name, Some(parse_number(length, line, "length")?)),
        _ => {
            return Err(parse_error(
                line,
                &format!("expected '{} NAME [length N]'", kind.keyword()),
            ));
        }
    };
    let mut builder = SchemaBuilder::new(name).with_layout(mode);
    if let Some(declared) = declared {
        builder = builder.declared_length(declared);
    }
    Ok(Section {
        kind,
        name: name.to_string(),
        line,
        builder,
    })
}

fn parse_field(
    builder: SchemaBuilder,
    tokens: &[&str],
    line: usize,
) -> Result<SchemaBuilder, SchemaError> {
    let (name, width, kind, options) = match tokens {
        [name, width, kind, options @ ..] => (*name, *width, *kind, options),
        _ => return Err(parse_error(line, "expected 'NAME WIDTH KIND'")),
    };
    let width = parse_number(width, line, "width")?;
    let kind: FieldKind = kind.parse().map_err(|e: String| parse_error(line, &e))?;

    let mut padding = kind.default_padding();
    for option in options {
        match option.split_once('=') {
            Some(("pad", value)) => {
                padding = value
                    .parse::<Padding>()
                    .map_err(|e| parse_error(line, &e))?;
            }
            _ => {
                return Err(parse_error(
                    line,
                    &format!("unknown field option '{}'", option),
                ));
            }
        }
    }
    Ok(builder.padded_field(name, width, kind, padding))
}

fn lookup(
    blocks: &[RecordSchema],
    index: &HashMap<String, usize>,
    name: &str,
    line: usize,
) -> Result<RecordSchema, SchemaError> {
    index
        .get(name)
        .and_then(|&i| blocks.get(i))
        .cloned()
        .ok_or_else(|| SchemaError::UnknownBlock {
            name: name.to_string(),
            line,
        })
}

fn parse_number(token: &str, line: usize, what: &str) -> Result<usize, SchemaError> {
    token
        .parse()
        .map_err(|_| parse_error(line, &format!("invalid {} '{}'", what, token)))
}

fn parse_error(line: usize, reason: &str) -> SchemaError {
    SchemaError::Parse {
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Entry;

    const SAMPLE: &str = "\
# sample
layout trailing-attribute

block c1101InBlock  # input
  formlang   1  code(k,e)
  code       6  text
end

layout packed
block c1101OutBlock2
  time       8  text
  price      7  decimal   pad=space-left
end

message c1101
  block c1101InBlock
  group c1101OutBlock2 20 as rows
end
";

    #[test]
    fn test_parse_sample() {
        let layout = Layout::parse(SAMPLE).unwrap();
        assert_eq!(layout.blocks().len(), 2);
        assert_eq!(layout.messages().len(), 1);

        let input = layout.block("c1101InBlock").unwrap();
        assert_eq!(input.length(), 9);
        assert_eq!(
            input.field("formlang").unwrap().kind,
            FieldKind::code(["k", "e"])
        );

        let rows = layout.block("c1101OutBlock2").unwrap();
        assert_eq!(rows.length(), 15);
        assert_eq!(rows.field("price").unwrap().padding, Padding::SpaceLeft);

        let message = layout.message("c1101").unwrap();
        assert_eq!(message.length(), 9 + 15 * 20);
        match message.entry("rows") {
            Some(Entry::Group(group)) => assert_eq!(group.count, 20),
            other => panic!("unexpected entry: {other:?}"),
        }
        assert_eq!(layout.schemas().count(), 3);
    }

    #[test]
    fn test_parse_unknown_block() {
        let text = "message c1101\n  block missing\nend\n";
        assert_eq!(
            Layout::parse(text).unwrap_err(),
            SchemaError::UnknownBlock {
                name: "missing".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let bad_kind = "block b\n  code 6 blob\nend\n";
        assert!(matches!(
            Layout::parse(bad_kind),
            Err(SchemaError::Parse { line: 2, .. })
        ));

        let unterminated = "block b\n  code 6 text\n";
        assert!(matches!(
            Layout::parse(unterminated),
            Err(SchemaError::Parse { line: 1, .. })
        ));

        let stray = "code 6 text\n";
        assert!(matches!(
            Layout::parse(stray),
            Err(SchemaError::Parse { line: 1, .. })
        ));

        let bad_option = "block b\n  code 6 text align=left\nend\n";
        assert!(matches!(
            Layout::parse(bad_option),
            Err(SchemaError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_duplicate_block() {
        let text = "block b\n  code 6 text\nend\nblock b\n  code 6 text\nend\n";
        assert!(matches!(
            Layout::parse(text),
            Err(SchemaError::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn test_parse_declared_length_and_filler() {
        let text = "block b length 10\n  code 6 text\n  filler spare 4\nend\n";
        let layout = Layout::parse(text).unwrap();
        assert_eq!(layout.block("b").unwrap().length(), 10);

        let short = "block b length 9\n  code 6 text\n  filler spare 4\nend\n";
        assert!(matches!(
            Layout::parse(short),
            Err(SchemaError::LengthMismatch { declared: 9, computed: 10, .. })
        ));
    }

    #[test]
    fn test_field_named_like_keyword() {
        let text = "block b\n  filler 9 text\nend\n";
        let layout = Layout::parse(text).unwrap();
        assert!(layout.block("b").unwrap().field("filler").is_some());
    }
}
