//! Model extraction from `sequelize.define(...)` calls.
//!
//! A pattern scanner, not a JavaScript parser. Model files follow a narrow
//! shape; computed names, spread attributes and runtime-built types are
//! skipped instead of reported.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::comments::strip_comments;
use crate::types::{FieldDescriptor, FieldType, ModelInfo};

/// `DataTypes.X`, `Sequelize.X` and `Sequelize.DataTypes.X`.
const TYPE_NAMESPACE: &str = r"(?:Sequelize\s*\.\s*)?(?:DataTypes|Sequelize)\s*\.\s*";

/// Start of a `sequelize.define` call; the arguments are scanned by hand.
static DEFINE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsequelize\s*\.\s*define\b").expect("define pattern is valid"));

/// One top-level entry: `name: value`, key optionally quoted.
static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^["'`]?(\w+)["'`]?\s*:\s*(.*)$"#).expect("entry pattern is valid")
});

/// A data type value such as `DataTypes.STRING(255)`.
static VALUE_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{TYPE_NAMESPACE}(\w+)")).expect("value type pattern is valid"));

static ARRAY_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{TYPE_NAMESPACE}(?i:ARRAY)\s*\(\s*{TYPE_NAMESPACE}(\w+)"))
        .expect("array pattern is valid")
});

/// Extract the first model defined in a file.
///
/// Returns `None` for files without a `sequelize.define` call, which is the
/// common case for association or index files.
pub fn extract_model(text: &str) -> Option<ModelInfo> {
    let cleaned = strip_comments(text);
    DEFINE_CALL
        .find_iter(&cleaned)
        .find_map(|call| read_define(&cleaned[call.end()..]))
}

/// Read `<Generic>("Name", { attributes }` following `sequelize.define`.
fn read_define(rest: &str) -> Option<ModelInfo> {
    let rest = skip_generic(rest.trim_start())?.trim_start();
    let rest = rest.strip_prefix('(')?.trim_start();
    let (name, rest) = read_quoted(rest)?;
    let rest = rest.trim_start().strip_prefix(',')?.trim_start();
    if !rest.starts_with('{') {
        return None;
    }
    let end = block_end(rest)?;
    Some(ModelInfo::new(name, parse_attributes(&rest[..end])))
}

/// Skip a TypeScript type argument list, nested ones included.
fn skip_generic(text: &str) -> Option<&str> {
    if !text.starts_with('<') {
        return Some(text);
    }
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[i + 1..]);
                }
            }
            _ => {}
        }
    }
    None
}

/// A string literal in any of the three quote styles, and the text after it.
fn read_quoted(text: &str) -> Option<(&str, &str)> {
    let quote = text.chars().next().filter(|c| matches!(c, '"' | '\'' | '`'))?;
    let body = &text[1..];
    let end = body.find(quote)?;
    let name = &body[..end];
    (!name.is_empty()).then_some((name, &body[end + 1..]))
}

/// Byte length of the bracketed block that opens at the start of `block`.
fn block_end(block: &str) -> Option<usize> {
    let mut nesting = Nesting::default();
    block
        .char_indices()
        .find(|&(_, c)| nesting.advance(c) && nesting.depth == 0)
        .map(|(i, c)| i + c.len_utf8())
}

/// Bracket depth and string-literal state while walking source text.
#[derive(Debug, Default)]
struct Nesting {
    depth: usize,
    quote: Option<char>,
    escaped: bool,
}

impl Nesting {
    /// Step over `c`. Returns false while inside a string literal.
    fn advance(&mut self, c: char) -> bool {
        if let Some(open) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == open {
                self.quote = None;
            }
            return false;
        }

        match c {
            '"' | '\'' | '`' => {
                self.quote = Some(c);
                return false;
            }
            '{' | '[' | '(' => self.depth += 1,
            '}' | ']' | ')' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        true
    }
}

/// Split an attribute block into field descriptors, in declaration order.
///
/// Entries are separated at top-level commas only, so braces, brackets and
/// parentheses inside a value never split or end an entry early. Entries
/// that are not `name: value` pairs (spreads, stray tokens) are skipped.
pub fn parse_attributes(block: &str) -> Vec<FieldDescriptor> {
    entries(strip_braces(block.trim()).unwrap_or(block))
        .map(|(name, value)| parse_field(name, value))
        .collect()
}

fn strip_braces(text: &str) -> Option<&str> {
    text.strip_prefix('{').and_then(|inner| inner.strip_suffix('}'))
}

/// Top-level `key: value` pairs of an object body.
fn entries(body: &str) -> impl Iterator<Item = (&str, &str)> {
    split_top_level(body).filter_map(|entry| {
        let caps = ENTRY.captures(entry)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().trim()))
    })
}

/// Split on commas that sit outside any bracket pair or string literal.
fn split_top_level(body: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if nesting.advance(c) && c == ',' && nesting.depth == 0 {
            parts.push(&body[start..i]);
            start = i + 1;
        }
    }
    parts.push(&body[start..]);

    parts.into_iter().map(str::trim).filter(|part| !part.is_empty())
}

/// Build a descriptor from one attribute's value.
///
/// An object value is read through its own top-level properties (`type`,
/// `allowNull`, `primaryKey`), so options nested deeper never leak in.
/// Anything else is read as a bare data type.
fn parse_field(name: &str, value: &str) -> FieldDescriptor {
    let Some(props) = strip_braces(value) else {
        return FieldDescriptor::new(name, read_type(value), false, false);
    };

    let mut field_type = FieldType::Unknown;
    let mut nullable = false;
    let mut primary_key = false;
    for (key, value) in entries(props) {
        match key {
            "type" => field_type = read_type(value),
            "allowNull" => nullable = value == "true",
            "primaryKey" => primary_key = value == "true",
            _ => {}
        }
    }
    FieldDescriptor::new(name, field_type, nullable, primary_key)
}

/// Uppercased type tag of a data type value, resolving arrays.
fn read_type(value: &str) -> FieldType {
    VALUE_TYPE
        .captures(value)
        .map(|caps| {
            let tag = caps[1].to_uppercase();
            let element = ARRAY_ELEMENT.captures(value).map(|inner| inner[1].to_string());
            FieldType::from_tag(&tag, element.as_deref())
        })
        .unwrap_or(FieldType::Unknown)
}
