//! Product data validation.
//!
//! Two phases run over the whole dataset:
//!
//! - **authored**: types, formats and enums of the fields set in each document,
//!   before enrichment
//! - **links**: reachability of every URL, after enrichment (opt-in, slow)
//!
//! Both phases only record [`Finding`]s; the run is decided once at the end
//! with [`decide`].

mod finding;
mod rules;
mod schema;
mod urls;

pub use finding::{Finding, Findings, Kind, Severity, Verdict, decide};
pub use urls::{HttpProbe, Probe, UrlChecker, UrlTarget};

use std::time::Instant;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rayon::prelude::*;

use crate::config::ValidateConfig;
use crate::product::Product;
use crate::{debug, log, utils::plural_count};

/// Inputs shared by every check of a run.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Reference date for `too-far-in-future`.
    pub today: NaiveDate,
    pub future_days: u32,
    pub categories: Vec<String>,
}

impl ValidationContext {
    /// Context for a run evaluated on `today`.
    pub fn new(config: &ValidateConfig, today: NaiveDate) -> Self {
        Self {
            today,
            future_days: config.future_days,
            categories: config.categories.clone(),
        }
    }

    /// Context evaluated on the local calendar date.
    pub fn today(config: &ValidateConfig) -> Self {
        Self::new(config, Local::now().date_naive())
    }
}

/// Validate the fields authored in every product.
pub fn validate_authored(products: &[Product], ctx: &ValidationContext, findings: &Findings) {
    products.par_iter().for_each(|product| {
        let start = Instant::now();
        debug!("validate"; "validating '{}'...", product.name);
        schema::check_product(product, ctx, findings);
        debug!(
            "validate";
            "product '{}' validated in {:.3} seconds",
            product.name,
            start.elapsed().as_secs_f64()
        );
    });
}

/// Check every URL of every product.
pub fn validate_links<P: Probe>(
    products: &[Product],
    checker: &UrlChecker<P>,
    findings: &Findings,
) -> Result<()> {
    let start = Instant::now();
    let targets: Vec<UrlTarget> = products.iter().flat_map(UrlTarget::collect).collect();

    log!(
        "urls";
        "checking {} from {}",
        plural_count(targets.len(), "url"),
        plural_count(products.len(), "product")
    );
    checker.check_all(&targets, findings)?;
    log!(
        "urls";
        "urls checked in {:.3} seconds",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PrefixRule, UrlCheckConfig};
    use crate::product::{Record, Value};

    struct AlwaysDown;

    impl Probe for AlwaysDown {
        fn probe(&self, _url: &str) -> Result<(), String> {
            Err("connection refused".to_string())
        }
    }

    fn product(name: &str, category: &str, link: &str) -> Product {
        let release: Record = [
            ("releaseCycle", Value::String("1.0".into())),
            ("link", Value::String(link.into())),
        ]
        .into_iter()
        .collect();
        let data: Record = [
            ("title", Value::String(name.into())),
            ("category", Value::String(category.into())),
            ("permalink", Value::String(format!("/{name}"))),
            ("releases", Value::Array(vec![Value::Map(release)])),
        ]
        .into_iter()
        .collect();
        let mut product = Product::new(format!("{name}.md"), data, "");
        product.apply_defaults(&crate::config::DefaultsConfig::default().to_record().unwrap());
        product.data.insert("releaseColumn", Value::Bool(false));
        product.data.insert("releaseDateColumn", Value::Bool(false));
        product.data.insert("eolColumn", Value::Bool(false));
        product
    }

    fn ctx() -> ValidationContext {
        ValidationContext::new(
            &ValidateConfig::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_validate_authored_across_products() {
        let products = vec![
            product("a", "lang", "https://a.example"),
            product("b", "toy", "https://b.example"),
            product("c", "nope", "https://c.example"),
        ];
        let findings = Findings::new();
        validate_authored(&products, &ctx(), &findings);
        assert_eq!(findings.error_count(), 2);
        assert_eq!(decide(&findings), Verdict::Fail { errors: 2 });
    }

    #[test]
    fn test_validate_links_ignore_and_suppress() {
        let products = vec![
            product("a", "lang", "https://ignored.example/a"),
            product("b", "lang", "https://flaky.example/b"),
            product("c", "lang", "https://down.example/c"),
        ];
        let config = UrlCheckConfig {
            ignore: vec![PrefixRule::new("https://ignored.example", "timeouts")],
            suppress: vec![PrefixRule::new("https://flaky.example", "flaky")],
            ..UrlCheckConfig::default()
        };
        let checker = UrlChecker::new(AlwaysDown, &config);
        let findings = Findings::new();
        validate_links(&products, &checker, &findings).unwrap();

        assert_eq!(findings.error_count(), 1);
        let found = findings.into_vec();
        assert_eq!(found.len(), 2);
        let error = found.into_iter().find(Finding::is_error).unwrap();
        assert_eq!(error.location(), "c.md#1.0");
        assert_eq!(error.kind, Kind::Reachability);
    }
}
