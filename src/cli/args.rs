//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Validate software lifecycle data and build its JSON api
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Product documents directory (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub products: Option<PathBuf>,

    /// API output directory (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Config file path (default: eolgen.toml)
    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = "eolgen.toml",
        value_hint = clap::ValueHint::FilePath
    )]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate product documents
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },

    /// Validate every product and write the JSON api
    #[command(visible_alias = "b")]
    Build {
        /// Probe every URL for reachability (slow)
        #[arg(
            short = 'u',
            long,
            action = clap::ArgAction::Set,
            num_args = 0..=1,
            default_missing_value = "true",
            require_equals = true
        )]
        check_urls: Option<bool>,
    },
}

/// Validate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Product files or directories to validate. If omitted, validates all products.
    /// Use `-` to read paths from stdin.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Probe every URL for reachability (slow)
    #[arg(
        short = 'u',
        long,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub check_urls: Option<bool>,

    /// Maximum number of days a release date may lie in the future
    #[arg(long, value_name = "DAYS")]
    pub future_days: Option<u32>,
}

impl Cli {
    /// URL-check override given on the command line, if any.
    pub const fn check_urls(&self) -> Option<bool> {
        match &self.command {
            Commands::Validate { args } => args.check_urls,
            Commands::Build { check_urls } => *check_urls,
        }
    }
}
