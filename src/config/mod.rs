//! Project configuration management for `eolgen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── defaults   # [defaults]
//! │   └── validate   # [validate], [validate.urls]
//! ├── error          # ConfigError
//! ├── util           # Config lookup, env flags, path resolution
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! Precedence, lowest to highest: built-in defaults, `eolgen.toml`,
//! the `MUST_CHECK_URLS` environment variable, command-line flags.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildConfig, DefaultsConfig, PrefixRule, UrlCheckConfig, ValidateConfig};

use crate::cli::{Cli, Commands};
use crate::product::Record;
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{env_flag, find_config_file, resolve};

/// Environment variable enabling URL checks for a run.
pub const CHECK_URLS_ENV: &str = "MUST_CHECK_URLS";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing eolgen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, empty when none was found (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source and output paths
    #[serde(default)]
    pub build: BuildConfig,

    /// Validation settings
    #[serde(default)]
    pub validate: ValidateConfig,

    /// Front-matter defaults for product documents
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. Without one, built-in
    /// defaults apply and the project root is the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.apply_env(std::env::var(CHECK_URLS_ENV).ok().as_deref());
        config.apply_cli(cli);
        config.normalize_paths();
        config.check()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Front-matter defaults as a product record.
    pub fn product_defaults(&self) -> Result<Record, ConfigError> {
        self.defaults.to_record()
    }

    /// Directory holding the product documents.
    pub fn products_dir(&self) -> &Path {
        &self.build.products
    }

    /// Directory the JSON api is written to.
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    // ========================================================================
    // overrides
    // ========================================================================

    /// Apply the `MUST_CHECK_URLS` environment value.
    fn apply_env(&mut self, check_urls: Option<&str>) {
        Self::update_option(&mut self.validate.check_urls, env_flag(check_urls).as_ref());
    }

    /// Apply command-line overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.products, cli.products.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        Self::update_option(&mut self.validate.check_urls, cli.check_urls().as_ref());

        if let Commands::Validate { args } = &cli.command {
            Self::update_option(&mut self.validate.future_days, args.future_days.as_ref());
        }
    }

    /// Update config option if an override value is provided.
    fn update_option<T: Clone>(config_option: &mut T, override_option: Option<&T>) {
        if let Some(option) = override_option {
            *config_option = option.clone();
        }
    }

    /// Resolve build paths against the project root.
    fn normalize_paths(&mut self) {
        self.build.products = resolve(&self.root, &self.build.products);
        self.build.output = resolve(&self.root, &self.build.output);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Reject settings the validator cannot run with.
    fn check(&self) -> Result<(), ConfigError> {
        let urls = &self.validate.urls;
        if urls.connect_timeout == 0 {
            return Err(ConfigError::Validation(
                "validate.urls.connect_timeout must be at least 1 second".into(),
            ));
        }
        if urls.read_timeout == 0 {
            return Err(ConfigError::Validation(
                "validate.urls.read_timeout must be at least 1 second".into(),
            ));
        }
        if urls.concurrency == 0 {
            return Err(ConfigError::Validation(
                "validate.urls.concurrency must be at least 1".into(),
            ));
        }
        if self.validate.categories.is_empty() {
            return Err(ConfigError::Validation(
                "validate.categories must not be empty".into(),
            ));
        }
        self.product_defaults().map(|_| ())
    }
}

/// Parse a config snippet, panicking on error.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    SiteConfig::parse(content).unwrap()
}

// ============================================================================
// tests
// ============================================================================
