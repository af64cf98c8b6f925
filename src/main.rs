//! eolgen - Validate software lifecycle data and build its JSON api.

mod cli;
mod config;
mod generator;
mod logger;
mod pipeline;
mod product;
mod utils;
mod validate;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;
    debug!(
        "config";
        "config {}, products {}, output {}",
        config.config_path.display(),
        config.products_dir().display(),
        config.output_dir().display()
    );

    match &cli.command {
        Commands::Validate { args } => cli::validate::validate_products(&config, args),
        Commands::Build { .. } => cli::build::build_api(&config),
    }
}
