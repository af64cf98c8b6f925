//! YAML front matter to [`Value`].
//!
//! Built from parser events rather than a resolved document tree so the
//! scalar style is still known: only plain scalars resolve to null, booleans,
//! numbers or dates. Quoted and block scalars are always strings.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

use super::load::LoadError;
use super::{Record, Value};

static RE_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$").unwrap()
});

/// Parse the first YAML document in `source`. An empty document is `Null`.
pub fn parse(source: &str) -> Result<Value, LoadError> {
    let mut builder = Builder::default();
    Parser::new(source.chars()).load(&mut builder, false)?;
    builder.finish()
}

enum Frame {
    Seq {
        anchor: usize,
        items: Vec<Value>,
    },
    Map {
        anchor: usize,
        record: Record,
        key: Option<String>,
    },
}

#[derive(Default)]
struct Builder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, Value>,
    root: Option<Value>,
    error: Option<LoadError>,
}

impl Builder {
    fn finish(self) -> Result<Value, LoadError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root.unwrap_or(Value::Null)),
        }
    }

    fn remember(&mut self, anchor: usize, value: &Value) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
    }

    /// Attach a finished node to its parent.
    fn push(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Seq { items, .. }) => items.push(value),
            Some(Frame::Map { record, key, .. }) => match key.take() {
                Some(key) => {
                    record.insert(key, value);
                }
                None => match mapping_key(value) {
                    Ok(name) => *key = Some(name),
                    Err(err) => self.error = Some(err),
                },
            },
        }
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let (anchor, value) = match frame {
            Frame::Seq { anchor, items } => (anchor, Value::Array(items)),
            Frame::Map { anchor, record, .. } => (anchor, Value::Map(record)),
        };
        self.remember(anchor, &value);
        self.push(value);
    }
}

impl EventReceiver for Builder {
    fn on_event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        match event {
            Event::Scalar(text, style, anchor, ..) => {
                let value = resolve(text, style);
                self.remember(anchor, &value);
                self.push(value);
            }
            Event::Alias(anchor) => {
                let value = self.anchors.get(&anchor).cloned().unwrap_or(Value::Null);
                self.push(value);
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Seq {
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Map {
                anchor,
                record: Record::new(),
                key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => self.close(),
            _ => {}
        }
    }
}

fn mapping_key(value: Value) -> Result<String, LoadError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Array(_) | Value::Map(_) => Err(LoadError::UnsupportedKey(value.kind())),
        scalar => Ok(scalar.to_string()),
    }
}

/// Resolve a scalar with the YAML core schema, plus `YYYY-MM-DD` dates.
fn resolve(text: String, style: TScalarStyle) -> Value {
    if !matches!(style, TScalarStyle::Plain) {
        return Value::String(text);
    }
    match text.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => Value::Null,
        "true" | "True" | "TRUE" => Value::Bool(true),
        "false" | "False" | "FALSE" => Value::Bool(false),
        plain => {
            if let Some(n) = parse_number(plain) {
                Value::Number(n)
            } else if let Some(date) = Value::parse_date(plain) {
                Value::Date(date)
            } else {
                Value::String(text)
            }
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if let Some(hex) = s.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok().map(|n| n as f64);
    }
    if let Some(oct) = s.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok().map(|n| n as f64);
    }
    match s {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ if RE_FLOAT.is_match(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scalar(source: &str) -> Value {
        match parse(&format!("v: {source}")).unwrap() {
            Value::Map(record) => record.get("v").cloned().unwrap(),
            other => panic!("expected a mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_scalars_resolve() {
        assert_eq!(scalar("~"), Value::Null);
        assert_eq!(scalar(""), Value::Null);
        assert_eq!(scalar("True"), Value::Bool(true));
        assert_eq!(scalar("false"), Value::Bool(false));
        assert_eq!(scalar("121"), Value::Number(121.0));
        assert_eq!(scalar("3.10"), Value::Number(3.1));
        assert_eq!(scalar("-1e3"), Value::Number(-1000.0));
        assert_eq!(scalar("0x1F"), Value::Number(31.0));
        assert_eq!(
            scalar("2024-01-15"),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(scalar("Security Support"), Value::String("Security Support".into()));
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        assert_eq!(scalar("\"2024-01-15\""), Value::String("2024-01-15".into()));
        assert_eq!(scalar("'2024-01-15'"), Value::String("2024-01-15".into()));
        assert_eq!(scalar("\"3.10\""), Value::String("3.10".into()));
        assert_eq!(scalar("'true'"), Value::String("true".into()));
        assert_eq!(scalar("\"null\""), Value::String("null".into()));
    }

    #[test]
    fn test_invalid_date_stays_string() {
        assert_eq!(scalar("2024-02-30"), Value::String("2024-02-30".into()));
        assert_eq!(scalar("2024-1-5"), Value::String("2024-1-5".into()));
    }

    #[test]
    fn test_nested_structure_and_order() {
        let doc = "b: 1\na:\n  - x\n  - {k: v, n: 2}\nc: []\n";
        let Value::Map(record) = parse(doc).unwrap() else {
            panic!("expected a mapping");
        };
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a", "c"]);

        let items = record.get("a").and_then(Value::as_array).unwrap();
        assert_eq!(items[0], Value::String("x".into()));
        let inner = items[1].as_map().unwrap();
        assert_eq!(inner.get("n"), Some(&Value::Number(2.0)));
        assert_eq!(record.get("c"), Some(&Value::Array(Vec::new())));
    }

    #[test]
    fn test_anchor_and_alias() {
        let doc = "base: &base\n  eol: false\ncopy: *base\n";
        let Value::Map(record) = parse(doc).unwrap() else {
            panic!("expected a mapping");
        };
        assert_eq!(record.get("base"), record.get("copy"));
    }

    #[test]
    fn test_non_scalar_key_rejected() {
        let err = parse("? [a, b]\n: c\n").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedKey("array")));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse("").unwrap(), Value::Null);
        assert_eq!(parse("\n").unwrap(), Value::Null);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(parse("title: [unclosed\n"), Err(LoadError::Yaml(_))));
    }
}
