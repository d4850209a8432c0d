//! Header line text format.
//!
//! ```text
//! # name[:type]<TAB>...<TAB># ORDER: name[:kind][:desc], ...
//! ```
//!
//! Parsing is lenient about separators (fields and order entries may be
//! separated by commas and/or whitespace). Formatting is canonical: tabs
//! between fields, `, ` between order entries, string types and
//! lexicographic kinds omitted. Formatting a parsed header and parsing it
//! again yields the same schema.

use std::fmt;
use std::str::FromStr;

use tabkit_ast::Type;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{Field, OrderField, OrderKind, Schema};

const ORDER_MARKER: &str = "# ORDER:";

fn split_entries(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
}

/// Parse a header line into a [`Schema`].
///
/// A trailing newline is ignored.
pub fn parse_header(line: &str) -> SchemaResult<Schema> {
    let line = line.trim_end_matches(['\n', '\r']);
    let Some(body) = line.strip_prefix('#') else {
        return Err(SchemaError::BadHeader);
    };

    let (fields_text, order) = match body.find(ORDER_MARKER) {
        Some(at) => (
            &body[..at],
            parse_order(&body[at + ORDER_MARKER.len()..])?,
        ),
        None => (body, Vec::new()),
    };

    let fields = split_entries(fields_text)
        .map(parse_field)
        .collect::<SchemaResult<Vec<_>>>()?;
    if fields.is_empty() {
        return Err(SchemaError::BadHeader);
    }

    Schema::new(fields, order)
}

fn parse_field(entry: &str) -> SchemaResult<Field> {
    match entry.split_once(':') {
        Some((name, "")) => Ok(Field::new(name, Type::String)),
        Some((name, ty)) => {
            let ty = Type::from_str(ty).map_err(|err| SchemaError::UnknownType(err.0))?;
            Ok(Field::new(name, ty))
        }
        None => Ok(Field::new(entry, Type::String)),
    }
}

/// Parse an order list: `name[:str|num|generic][:desc|:asc]` entries
/// separated by commas and/or whitespace.
///
/// The kind must precede the direction and each may appear once, so
/// `a:desc:desc`, `a:str:str` and `a:desc:str` are all rejected.
pub fn parse_order(text: &str) -> SchemaResult<Vec<OrderField>> {
    split_entries(text).map(parse_order_entry).collect()
}

fn parse_order_entry(entry: &str) -> SchemaResult<OrderField> {
    let bad_format = || SchemaError::BadOrderFormat(entry.to_string());

    let mut parts = entry.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    let mut kind = None;
    let mut descending = false;

    for part in parts {
        if let Some(parsed) = OrderKind::from_name(part) {
            if descending || kind.is_some() {
                return Err(bad_format());
            }
            kind = Some(parsed);
        } else if descending {
            return Err(bad_format());
        } else if part == "desc" {
            descending = true;
        } else if !part.is_empty() && part != "asc" {
            return Err(bad_format());
        }
    }

    Ok(OrderField {
        name: name.to_string(),
        kind: kind.unwrap_or_default(),
        descending,
    })
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_header(s)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("# ")?;
        for (i, field) in self.fields().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            f.write_str(&field.name)?;
            if field.ty != Type::String {
                write!(f, ":{}", field.ty)?;
            }
        }

        if !self.order().is_empty() {
            f.write_str("\t")?;
            f.write_str(ORDER_MARKER)?;
            for (i, key) in self.order().iter().enumerate() {
                f.write_str(if i == 0 { " " } else { ", " })?;
                write!(f, "{}", key)?;
            }
        }
        Ok(())
    }
}
