//! Output generators.
//!
//! - **Api**: per-release, per-product and index JSON files (`api/`)

pub mod api;

pub use api::{ApiSummary, build_api};

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};

/// Write `value` as compact JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
