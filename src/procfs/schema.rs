//! Declarative field schemas for kernel text interfaces.
//!
//! Every interface is described as an ordered table of `FieldSpec`s. A spec
//! names the field, says where its raw text lives (`Selector`) and what it
//! should parse as (`FieldKind`). Extraction is a single pass over the table;
//! there is no per-interface scanning code.

use tracing::debug;

use super::field::{Absence, Field};
use crate::error::SourceError;

/// Where a field's raw text lives inside an interface's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Rest of the first line whose text before `delimiter` equals `key`.
    /// Surrounding whitespace and double quotes are removed.
    Keyed { key: &'static str, delimiter: char },
    /// Whitespace column `column` of the first line whose first token is `key`.
    /// Column 0 is the key itself.
    Row { key: &'static str, column: usize },
    /// 1-based whitespace token of the whole content.
    Token(usize),
    /// 1-based field of a `/proc/<pid>/stat` record (proc(5) numbering).
    /// Fields after the command name are counted from the last `)`.
    StatField(usize),
}

impl Selector {
    pub const fn keyed(key: &'static str, delimiter: char) -> Self {
        Selector::Keyed { key, delimiter }
    }

    pub const fn row(key: &'static str, column: usize) -> Self {
        Selector::Row { key, column }
    }

    /// Locates the raw text for this selector.
    pub fn locate<'c>(&self, content: &'c str) -> Option<&'c str> {
        match *self {
            Selector::Keyed { key, delimiter } => content.lines().find_map(|line| {
                let (k, rest) = line.split_once(delimiter)?;
                if k.trim() == key {
                    Some(rest.trim().trim_matches('"'))
                } else {
                    None
                }
            }),
            Selector::Row { key, column } => content.lines().find_map(|line| {
                let mut tokens = line.split_whitespace();
                if tokens.next()? != key {
                    return None;
                }
                if column == 0 {
                    return Some(key);
                }
                tokens.nth(column - 1)
            }),
            Selector::Token(n) => {
                if n == 0 {
                    return None;
                }
                content.split_whitespace().nth(n - 1)
            }
            Selector::StatField(n) => locate_stat_field(content, n),
        }
    }
}

fn locate_stat_field(content: &str, n: usize) -> Option<&str> {
    let (open, close) = match (content.find('('), content.rfind(')')) {
        (Some(open), Some(close)) if open < close => (open, close),
        // No parenthesised command name: fall back to plain token positions
        _ => return Selector::Token(n).locate(content),
    };

    match n {
        0 => None,
        1 => content[..open].split_whitespace().next(),
        2 => Some(&content[open + 1..close]),
        _ => content[close + 1..].split_whitespace().nth(n - 3),
    }
}

/// Declared target type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// First whitespace token as an unsigned integer.
    Unsigned,
    /// First whitespace token as a float.
    Float,
}

/// A typed extracted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Unsigned(u64),
    Float(f64),
}

impl FieldKind {
    fn parse(&self, raw: &str) -> Field<Value> {
        match self {
            FieldKind::Text => Field::Present(Value::Text(raw.to_string())),
            FieldKind::Unsigned => match raw.split_whitespace().next().map(str::parse::<u64>) {
                Some(Ok(v)) => Field::Present(Value::Unsigned(v)),
                _ => Field::Absent(Absence::Malformed),
            },
            FieldKind::Float => match raw.split_whitespace().next().map(str::parse::<f64>) {
                Some(Ok(v)) if v.is_finite() => Field::Present(Value::Float(v)),
                _ => Field::Absent(Absence::Malformed),
            },
        }
    }
}

/// One row of a schema table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub selector: Selector,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str, selector: Selector) -> Self {
        Self {
            name,
            selector,
            kind: FieldKind::Text,
        }
    }

    pub const fn unsigned(name: &'static str, selector: Selector) -> Self {
        Self {
            name,
            selector,
            kind: FieldKind::Unsigned,
        }
    }

    pub const fn float(name: &'static str, selector: Selector) -> Self {
        Self {
            name,
            selector,
            kind: FieldKind::Float,
        }
    }
}

/// Ordered field table for one interface.
#[derive(Debug)]
pub struct Schema {
    pub interface: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Extracts every field of the table from `content`.
    pub fn extract(&'static self, content: &str) -> Extracted {
        let values = self
            .fields
            .iter()
            .map(|spec| match spec.selector.locate(content) {
                Some(raw) => {
                    let parsed = spec.kind.parse(raw);
                    if !parsed.is_present() {
                        let err = SourceError::MalformedField {
                            field: format!("{}.{}", self.interface, spec.name),
                            value: raw.to_string(),
                        };
                        debug!("{}", err);
                    }
                    parsed
                }
                None => Field::Absent(Absence::NotFound),
            })
            .collect();

        Extracted {
            schema: self,
            values,
        }
    }

    /// Result for a source that could not be read at all.
    pub fn absent(&'static self, reason: Absence) -> Extracted {
        Extracted {
            schema: self,
            values: vec![Field::Absent(reason); self.fields.len()],
        }
    }
}

/// Values extracted by a schema, addressed by field name.
#[derive(Debug, Clone)]
pub struct Extracted {
    schema: &'static Schema,
    values: Vec<Field<Value>>,
}

impl Extracted {
    fn get(&self, name: &str) -> Field<&Value> {
        let idx = self.schema.fields.iter().position(|spec| spec.name == name);
        match idx.and_then(|i| self.values.get(i)) {
            Some(Field::Present(v)) => Field::Present(v),
            Some(Field::Absent(reason)) => Field::Absent(*reason),
            None => Field::Absent(Absence::NotFound),
        }
    }

    pub fn text(&self, name: &str) -> Field<String> {
        match self.get(name) {
            Field::Present(Value::Text(s)) => Field::Present(s.clone()),
            Field::Present(_) => Field::Absent(Absence::Malformed),
            Field::Absent(reason) => Field::Absent(reason),
        }
    }

    pub fn unsigned(&self, name: &str) -> Field<u64> {
        match self.get(name) {
            Field::Present(Value::Unsigned(v)) => Field::Present(*v),
            Field::Present(_) => Field::Absent(Absence::Malformed),
            Field::Absent(reason) => Field::Absent(reason),
        }
    }

    pub fn float(&self, name: &str) -> Field<f64> {
        match self.get(name) {
            Field::Present(Value::Float(v)) => Field::Present(*v),
            Field::Present(_) => Field::Absent(Absence::Malformed),
            Field::Absent(reason) => Field::Absent(reason),
        }
    }

    /// Number of fields that were extracted successfully.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_present()).count()
    }
}
