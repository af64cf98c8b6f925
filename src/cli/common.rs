//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extension of product documents.
const PRODUCT_EXT: &str = "md";

/// Collect product files based on CLI paths
///
/// No paths means every product in `products_dir`. A single `-` reads the
/// paths from stdin. Relative paths are tried as given, then under
/// `products_dir`.
pub fn collect_product_files(paths: &[PathBuf], products_dir: &Path) -> Result<Vec<PathBuf>> {
    // Handle stdin case: read paths from stdin when `-` is passed
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    if paths.is_empty() {
        return collect_dir(products_dir);
    }

    let mut files = Vec::new();
    for path in &paths {
        let resolved = resolve_path(path, products_dir);

        if resolved.is_file() {
            if is_product_file(&resolved) {
                files.push(resolved);
            } else {
                anyhow::bail!("Not a product document: {}", path.display());
            }
        } else if resolved.is_dir() {
            files.extend(collect_dir(&resolved)?);
        } else {
            anyhow::bail!(
                "Path not found: {}\n  Tried:\n    - {}\n    - {}",
                path.display(),
                path.display(),
                products_dir.join(path).display()
            );
        }
    }

    Ok(files)
}

/// Product documents directly inside `dir`, sorted by name.
fn collect_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read products directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read products directory {}", dir.display()))?
            .path();
        if path.is_file() && is_product_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_product_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PRODUCT_EXT)
}

/// `path` as given when it exists, otherwise relative to `base`.
fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Read file paths from stdin, one per line
pub fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    read_paths(io::stdin().lock())
}

fn read_paths(reader: impl BufRead) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read paths from stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        let products = dir.path().join("products");
        fs::create_dir_all(products.join("nested")).unwrap();
        fs::write(products.join("python.md"), "").unwrap();
        fs::write(products.join("nodejs.md"), "").unwrap();
        fs::write(products.join("README.txt"), "").unwrap();
        fs::write(products.join("nested/ignored.md"), "").unwrap();
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_collect_all_sorted() {
        let dir = setup();
        let files = collect_product_files(&[], &dir.path().join("products")).unwrap();
        assert_eq!(names(&files), ["nodejs.md", "python.md"]);
    }

    #[test]
    fn test_collect_relative_to_products_dir() {
        let dir = setup();
        let products = dir.path().join("products");
        let files = collect_product_files(&[PathBuf::from("python.md")], &products).unwrap();
        assert_eq!(files, [products.join("python.md")]);
    }

    #[test]
    fn test_collect_rejects_other_files() {
        let dir = setup();
        let products = dir.path().join("products");
        assert!(collect_product_files(&[products.join("README.txt")], &products).is_err());
        assert!(collect_product_files(&[PathBuf::from("missing.md")], &products).is_err());
    }

    #[test]
    fn test_collect_missing_products_dir() {
        let dir = TempDir::new().unwrap();
        assert!(collect_product_files(&[], &dir.path().join("products")).is_err());
    }

    #[test]
    fn test_read_paths() {
        let input = "products/python.md\n\n  products/nodejs.md  \n";
        let paths = read_paths(input.as_bytes()).unwrap();
        assert_eq!(
            paths,
            [
                PathBuf::from("products/python.md"),
                PathBuf::from("products/nodejs.md")
            ]
        );
    }
}
