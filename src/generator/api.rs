//! JSON api generation.
//!
//! # Layout
//!
//! ```text
//! api/
//! ├── all.json          # ["nodejs", "python"]
//! ├── python.json       # [{"cycle":"3.12", ...}, ...]
//! └── python/
//!     ├── 3.12.json     # {"releaseDate":"2023-10-02", ...}
//!     └── 3.11.json
//! ```
//!
//! A release file holds every release field except `releaseCycle`, which is
//! implied by the file name (`/` in a cycle becomes `-`). Product files list
//! every release with the cycle re-added as `cycle`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::write_json;
use crate::product::{Product, Record, Release, Value};
use crate::{log, utils::plural_count};

const CYCLE_KEY: &str = "releaseCycle";

/// What a projection wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiSummary {
    pub products: usize,
    pub releases: usize,
}

/// Write the api for `products` under `output`.
///
/// Each product directory is owned by a single worker. `all.json` is written
/// last. Any filesystem error aborts the projection.
pub fn build_api(products: &[Product], output: &Path) -> Result<ApiSummary> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create directory {}", output.display()))?;

    let owned = assign_permalinks(products)?;
    let written: Vec<(&str, usize)> = owned
        .par_iter()
        .map(|&(product, permalink)| {
            write_product(product, permalink, output).map(|count| (permalink, count))
        })
        .collect::<Result<_>>()?;

    let mut permalinks: Vec<&str> = written.iter().map(|(permalink, _)| *permalink).collect();
    permalinks.sort_unstable();
    write_json(&output.join("all.json"), &permalinks)?;

    let summary = ApiSummary {
        products: written.len(),
        releases: written.iter().map(|(_, count)| count).sum(),
    };
    log!(
        "api";
        "wrote {} and {} to {}",
        plural_count(summary.products, "product"),
        plural_count(summary.releases, "release"),
        output.display()
    );

    Ok(summary)
}

/// Pair each product with its permalink, refusing two products on one directory.
fn assign_permalinks(products: &[Product]) -> Result<Vec<(&Product, &str)>> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    let mut owned = Vec::with_capacity(products.len());

    for product in products {
        let Some(permalink) = product.permalink() else {
            log!("warning"; "skipping '{}': no permalink", product.name);
            continue;
        };
        if let Some(first) = owners.insert(permalink, &product.name) {
            anyhow::bail!(
                "duplicate permalink '/{}' in '{}' and '{}'",
                permalink,
                first,
                product.name
            );
        }
        owned.push((product, permalink));
    }
    Ok(owned)
}

/// Write one product's release files and aggregate file. Returns the release count.
fn write_product(product: &Product, permalink: &str, output: &Path) -> Result<usize> {
    let dir = output.join(permalink);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut entries = Vec::new();
    for release in product.releases() {
        let Some(cycle) = release.get(CYCLE_KEY) else {
            log!("warning"; "skipping a release of '{}': no {}", product.name, CYCLE_KEY);
            continue;
        };

        let content = release_content(release);
        write_json(&dir.join(json_filename(cycle)), &content)?;
        entries.push(aggregate_entry(cycle, content));
    }

    write_json(&output.join(format!("{permalink}.json")), &entries)?;
    Ok(entries.len())
}

/// Release file name: the cycle with `/` replaced by `-`.
pub fn json_filename(cycle: &Value) -> String {
    format!("{}.json", cycle.to_string().replace('/', "-"))
}

/// Every release field except the cycle.
fn release_content(release: &Release) -> Record {
    release
        .iter()
        .filter(|(key, _)| *key != CYCLE_KEY)
        .map(|(key, value)| (key, value.clone()))
        .collect()
}

/// `{"cycle": ...}` followed by the release content.
fn aggregate_entry(cycle: &Value, content: Record) -> Record {
    let mut entry = Record::new();
    entry.insert("cycle", cycle.clone());
    for (key, value) in content.iter() {
        entry.insert(key, value.clone());
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::parse_document;
    use tempfile::TempDir;

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn product(name: &str, source: &str) -> Product {
        parse_document(name, source).unwrap().unwrap()
    }

    #[test]
    fn test_release_and_aggregate_files() {
        let dir = TempDir::new().unwrap();
        let p = product(
            "demo.md",
            "---
permalink: /demo
releases:
  - releaseCycle: \"1.0\"
    eol: 2020-01-01
---
",
        );

        let summary = build_api(&[p], dir.path()).unwrap();
        assert_eq!(summary, ApiSummary { products: 1, releases: 1 });

        let release = read(&dir.path().join("demo/1.0.json"));
        assert_eq!(release, serde_json::json!({"eol": "2020-01-01"}));

        let aggregate = read(&dir.path().join("demo.json"));
        assert_eq!(
            aggregate,
            serde_json::json!([{"cycle": "1.0", "eol": "2020-01-01"}])
        );
    }

    #[test]
    fn test_release_field_order_preserved() {
        let dir = TempDir::new().unwrap();
        let p = product(
            "demo.md",
            "---
permalink: /demo
releases:
  - releaseCycle: \"2\"
    lts: true
    eol: false
    latest: \"2.1\"
---
",
        );
        build_api(&[p], dir.path()).unwrap();

        let raw = fs::read_to_string(dir.path().join("demo/2.json")).unwrap();
        assert_eq!(raw, "{\"lts\":true,\"eol\":false,\"latest\":\"2.1\"}\n");

        let raw = fs::read_to_string(dir.path().join("demo.json")).unwrap();
        assert_eq!(
            raw,
            "[{\"cycle\":\"2\",\"lts\":true,\"eol\":false,\"latest\":\"2.1\"}]\n"
        );
    }

    #[test]
    fn test_slash_in_cycle() {
        assert_eq!(json_filename(&Value::String("1/2".into())), "1-2.json");
        assert_eq!(json_filename(&Value::Number(10.0)), "10.json");

        let dir = TempDir::new().unwrap();
        let p = product(
            "demo.md",
            "---\npermalink: /demo\nreleases:\n  - releaseCycle: \"1/2\"\n---\n",
        );
        build_api(&[p], dir.path()).unwrap();
        assert!(dir.path().join("demo/1-2.json").is_file());
    }

    #[test]
    fn test_index_sorted() {
        let dir = TempDir::new().unwrap();
        let b = product("b.md", "---\npermalink: /b\nreleases: []\n---\n");
        let a = product("a.md", "---\npermalink: /a\nreleases: []\n---\n");

        build_api(&[b, a], dir.path()).unwrap();
        assert_eq!(read(&dir.path().join("all.json")), serde_json::json!(["a", "b"]));
        assert_eq!(read(&dir.path().join("a.json")), serde_json::json!([]));
    }

    #[test]
    fn test_rerun_overwrites() {
        let dir = TempDir::new().unwrap();
        let v1 = product(
            "demo.md",
            "---\npermalink: /demo\nreleases:\n  - releaseCycle: \"1\"\n    eol: false\n---\n",
        );
        let v2 = product(
            "demo.md",
            "---\npermalink: /demo\nreleases:\n  - releaseCycle: \"1\"\n    eol: true\n---\n",
        );
        build_api(&[v1], dir.path()).unwrap();
        build_api(&[v2], dir.path()).unwrap();
        assert_eq!(
            read(&dir.path().join("demo/1.json")),
            serde_json::json!({"eol": true})
        );
    }

    #[test]
    fn test_unwritable_output_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("api");
        fs::write(&blocker, "").unwrap();
        let p = product("demo.md", "---\npermalink: /demo\nreleases: []\n---\n");
        assert!(build_api(&[p], &blocker).is_err());
    }

    #[test]
    fn test_duplicate_permalink_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let a = product("a.md", "---\npermalink: /demo\nreleases: []\n---\n");
        let b = product("b.md", "---\npermalink: /demo\nreleases: []\n---\n");

        let err = build_api(&[a, b], dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate permalink '/demo' in 'a.md' and 'b.md'"
        );
        assert!(!dir.path().join("demo.json").exists());
        assert!(!dir.path().join("all.json").exists());
    }

    #[test]
    fn test_product_without_permalink_skipped() {
        let dir = TempDir::new().unwrap();
        let p = product("demo.md", "---\ntitle: Demo\n---\n");
        let summary = build_api(&[p], dir.path()).unwrap();
        assert_eq!(summary.products, 0);
        assert_eq!(read(&dir.path().join("all.json")), serde_json::json!([]));
    }
}
