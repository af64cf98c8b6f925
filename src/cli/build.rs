//! Api build orchestration.
//!
//! Build phases:
//! - **Collect** - Every product document in the products directory
//! - **Validate** - Authored fields, then URLs after enrichment when enabled
//! - **Project** - Per-release, per-product and index JSON files
//! - **Gate** - Fail the build when any error was recorded

use anyhow::Result;

use super::common::collect_product_files;
use super::report::conclude;
use crate::config::SiteConfig;
use crate::pipeline::{NoEnrichment, Pipeline};

/// Validate every product and write the api.
pub fn build_api(config: &SiteConfig) -> Result<()> {
    let files = collect_product_files(&[], config.products_dir())?;
    let defaults = config.product_defaults()?;

    let pipeline = Pipeline::from_config(config, &NoEnrichment)?.with_output(config.output_dir());
    let outcome = pipeline.run(&files, &defaults)?;

    conclude(outcome, "build canceled")
}
