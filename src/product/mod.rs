//! In-memory product records.
//!
//! A [`Product`] is one front-matter document: product-level fields, the
//! ordered `releases` list, and the markdown body. Releases stay inside the
//! product data as [`Value::Map`] entries so that validation sees exactly what
//! the author wrote (including a `releases` key of the wrong type).

mod load;
mod value;
mod yaml;

pub use load::{load_products, parse_document};
pub use value::{ColumnFlag, Record, Value};

/// A release is a plain record keyed by `releaseCycle`.
pub type Release = Record;

/// One lifecycle-tracked product.
#[derive(Debug, Clone)]
pub struct Product {
    /// Document file name (e.g. `python.md`), used to identify the product in logs.
    pub name: String,
    /// Front-matter fields in authored order.
    pub data: Record,
    /// Markdown body after the front matter.
    pub content: String,
}

impl Product {
    pub fn new(name: impl Into<String>, data: Record, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data,
            content: content.into(),
        }
    }

    /// Permalink without the leading `/`, used as the api directory name.
    pub fn permalink(&self) -> Option<&str> {
        let permalink = self.data.get("permalink")?.as_str()?;
        Some(permalink.strip_prefix('/').unwrap_or(permalink))
    }

    /// Release records in authored order. Entries that are not mappings are skipped.
    pub fn releases(&self) -> impl Iterator<Item = &Release> {
        self.data
            .get("releases")
            .and_then(Value::as_array)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_map)
    }

    /// Whether the per-release column driven by `flag` is shown.
    pub fn column_enabled(&self, flag: &str) -> bool {
        self.data
            .get(flag)
            .and_then(Value::as_column_flag)
            .is_some_and(ColumnFlag::is_enabled)
    }

    /// Fill keys the author did not set. Authored values always win.
    pub fn apply_defaults(&mut self, defaults: &Record) {
        for (key, value) in defaults.iter() {
            if !self.data.contains_key(key) {
                self.data.insert(key, value.clone());
            }
        }
    }
}
