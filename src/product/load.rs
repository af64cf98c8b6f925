//! Front-matter document loading.
//!
//! Product documents are markdown files with a YAML block delimited by `---`:
//!
//! ```text
//! ---
//! title: Python
//! permalink: /python
//! releases:
//!   - releaseCycle: "3.12"
//!     eol: 2028-10-31
//! ---
//!
//! > [Python](https://www.python.org/) is ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use thiserror::Error;
use yaml_rust2::scanner::ScanError;

use super::{Product, Record, Value, yaml};
use crate::debug;

/// Layout a document must declare (or omit) to be treated as a product.
const PRODUCT_LAYOUT: &str = "product";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing `---` front matter block")]
    MissingFrontMatter,

    #[error("invalid YAML front matter")]
    Yaml(#[from] ScanError),

    #[error("front matter must be a mapping, got {0}")]
    NotAMapping(&'static str),

    #[error("mapping keys must be scalars, got {0}")]
    UnsupportedKey(&'static str),
}

/// Load every product document in `files`, applying front-matter `defaults`.
///
/// Documents with a non-product `layout` are skipped. Any unreadable or
/// malformed document aborts the load.
pub fn load_products(files: &[PathBuf], defaults: &Record) -> Result<Vec<Product>> {
    let loaded: Vec<Option<Product>> = files
        .par_iter()
        .map(|file| load_product(file, defaults))
        .collect::<Result<_>>()?;

    Ok(loaded.into_iter().flatten().collect())
}

fn load_product(path: &Path, defaults: &Record) -> Result<Option<Product>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy())
        .into_owned();

    let product = parse_document(&name, &source)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok(product.map(|mut product| {
        product.apply_defaults(defaults);
        product
    }))
}

/// Parse one document. Returns `None` for non-product layouts.
pub fn parse_document(name: &str, source: &str) -> Result<Option<Product>, LoadError> {
    let (front_matter, body) = split_front_matter(source).ok_or(LoadError::MissingFrontMatter)?;

    let data = match yaml::parse(front_matter)? {
        Value::Map(record) => record,
        Value::Null => Record::new(),
        other => return Err(LoadError::NotAMapping(other.kind())),
    };

    if let Some(layout) = data.get("layout").and_then(Value::as_str)
        && layout != PRODUCT_LAYOUT
    {
        debug!("load"; "skipping {} (layout `{}`)", name, layout);
        return Ok(None);
    }

    Ok(Some(Product::new(name, data, body)))
}

/// Split a document into `(front_matter, body)`.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    let rest = trimmed.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let front_matter = &rest[..end];
    let body = rest[end + 4..].trim_start_matches(['\r', '\n']);
    Some((front_matter, body))
}
