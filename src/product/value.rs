//! Tagged front-matter values.
//!
//! Front matter is loosely typed, so every field is kept as a [`Value`] and
//! the validator decides what is acceptable. Dates are their own variant:
//! the loader turns plain `YYYY-MM-DD` scalars into [`Value::Date`], which is
//! what lets `is-date` tell a real date from a quoted lookalike.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Date format used in documents and in the JSON api.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single front-matter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(NaiveDate),
    Array(Vec<Value>),
    Map(Record),
}

/// `support`, `eol`, `lts`, ... are either a flag or the exact transition date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOrDate {
    Bool(bool),
    Date(NaiveDate),
}

/// Column switches are either a flag or a custom column label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFlag<'a> {
    Bool(bool),
    Label(&'a str),
}

impl ColumnFlag<'_> {
    /// A column is shown when set to `true` or given a label.
    #[inline]
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Label(_) => true,
        }
    }
}

impl Value {
    /// Human-readable type name used in validation messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_map(&self) -> Option<&Record> {
        match self {
            Self::Map(record) => Some(record),
            _ => None,
        }
    }

    pub const fn as_bool_or_date(&self) -> Option<BoolOrDate> {
        match self {
            Self::Bool(b) => Some(BoolOrDate::Bool(*b)),
            Self::Date(d) => Some(BoolOrDate::Date(*d)),
            _ => None,
        }
    }

    pub fn as_column_flag(&self) -> Option<ColumnFlag<'_>> {
        match self {
            Self::Bool(b) => Some(ColumnFlag::Bool(*b)),
            Self::String(s) => Some(ColumnFlag::Label(s.as_str())),
            _ => None,
        }
    }

    /// Parse a plain scalar as a calendar date (`YYYY-MM-DD` only).
    pub fn parse_date(s: &str) -> Option<NaiveDate> {
        if s.len() != 10 {
            return None;
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Self::String(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(record) => {
                f.write_str("{")?;
                for (i, (key, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Whole numbers are written without a fractional part (`121`, not `121.0`).
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() < 9.0e15).then(|| n as i64)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(record) => record.serialize(serializer),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// Insertion-ordered string-keyed mapping.
///
/// Records are small (a few dozen keys at most), so lookups are linear and
/// authored key order survives all the way to the JSON output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The value under `key` if it is present and not null.
    pub fn get_present(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
