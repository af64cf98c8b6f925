//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! products = "products"   # Product documents (relative to project root)
//! output = "api"          # JSON api output directory (relative to project root)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding one markdown document per product.
    pub products: PathBuf,

    /// Directory the JSON api is written to.
    pub output: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            products: "products".into(),
            output: "api".into(),
        }
    }
}
