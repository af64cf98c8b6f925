//! `[defaults]` section configuration.
//!
//! Front-matter defaults merged into every product before validation, the
//! same way a site generator applies collection defaults to its documents.
//! Keys set in the section replace the built-in value of the same key; keys
//! authored in a product always win over both.
//!
//! # Example
//!
//! ```toml
//! [defaults]
//! eolColumn = "Security Support"
//! activeSupportColumn = true
//! eolWarnThreshold = 90
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::product::{Record, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultsConfig {
    pub values: toml::Table,
}

impl DefaultsConfig {
    /// Built-in defaults with configured values layered on top.
    pub fn to_record(&self) -> Result<Record, ConfigError> {
        let mut record = builtin();
        for (key, value) in &self.values {
            let value = from_toml(value).map_err(|kind| {
                ConfigError::Validation(format!("defaults.{key}: unsupported {kind} value"))
            })?;
            record.insert(key.as_str(), value);
        }
        Ok(record)
    }
}

/// Host site defaults for product documents.
fn builtin() -> Record {
    const WARN_THRESHOLD: f64 = 121.0;

    [
        ("alternate_urls", Value::Array(Vec::new())),
        ("LTSLabel", Value::String("LTS".to_string())),
        ("eolColumn", Value::Bool(true)),
        ("eolWarnThreshold", Value::Number(WARN_THRESHOLD)),
        ("activeSupportColumn", Value::Bool(false)),
        ("activeSupportWarnThreshold", Value::Number(WARN_THRESHOLD)),
        ("releaseColumn", Value::Bool(true)),
        ("releaseDateColumn", Value::Bool(true)),
        ("discontinuedColumn", Value::Bool(false)),
        ("discontinuedWarnThreshold", Value::Number(WARN_THRESHOLD)),
        ("extendedSupportColumn", Value::Bool(false)),
        ("extendedSupportWarnThreshold", Value::Number(WARN_THRESHOLD)),
        ("auto", Value::Array(Vec::new())),
        ("identifiers", Value::Array(Vec::new())),
    ]
    .into_iter()
    .collect()
}

/// Convert a TOML value; returns the TOML kind name when unsupported.
#[allow(clippy::cast_precision_loss)]
fn from_toml(value: &toml::Value) -> Result<Value, &'static str> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(*i as f64),
        toml::Value::Float(f) => Value::Number(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => match (&dt.date, &dt.time) {
            (Some(date), None) => {
                Value::Date(Value::parse_date(&date.to_string()).ok_or("datetime")?)
            }
            _ => return Err("datetime"),
        },
        toml::Value::Array(items) => {
            Value::Array(items.iter().map(from_toml).collect::<Result<_, _>>()?)
        }
        toml::Value::Table(table) => Value::Map(
            table
                .iter()
                .map(|(k, v)| from_toml(v).map(|v| (k.as_str(), v)))
                .collect::<Result<Record, &'static str>>()?,
        ),
    })
}
