//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
mod report;
pub mod validate;

pub use args::{Cli, Commands, ValidateArgs};
