//! Configuration section definitions.
//!
//! Each module corresponds to a section in `eolgen.toml`:
//!
//! | Module     | TOML Section   | Purpose                                |
//! |------------|----------------|----------------------------------------|
//! | `build`    | `[build]`      | Product source and api output paths    |
//! | `defaults` | `[defaults]`   | Front-matter defaults for products     |
//! | `validate` | `[validate]`   | Schema rules and URL reachability      |

mod build;
mod defaults;
mod validate;

pub use build::BuildConfig;
pub use defaults::DefaultsConfig;
pub use validate::{PrefixRule, UrlCheckConfig, ValidateConfig};
