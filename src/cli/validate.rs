//! Product validation command.

use anyhow::Result;

use super::common::collect_product_files;
use super::report::conclude;
use crate::cli::ValidateArgs;
use crate::config::SiteConfig;
use crate::log;
use crate::pipeline::{NoEnrichment, Pipeline};

/// Validate product documents without writing the api.
pub fn validate_products(config: &SiteConfig, args: &ValidateArgs) -> Result<()> {
    let files = collect_product_files(&args.paths, config.products_dir())?;
    if files.is_empty() {
        log!("validate"; "no product files found");
        return Ok(());
    }

    let defaults = config.product_defaults()?;
    let pipeline = Pipeline::from_config(config, &NoEnrichment)?;
    let outcome = pipeline.run(&files, &defaults)?;

    conclude(outcome, "validation failed")
}
