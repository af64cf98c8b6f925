//! Validation and build pipeline.
//!
//! ```text
//! load -> validate (authored) -> enrich -> validate (links) -> api -> decide
//! ```
//!
//! Validation only records findings. The caller decides from
//! [`Outcome::verdict`] once everything has run, so a single run reports
//! every problem in the dataset.

mod enrich;

pub use enrich::{Enrich, NoEnrichment};

use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;

use crate::config::SiteConfig;
use crate::generator::{ApiSummary, build_api};
use crate::product::{Product, Record, load_products};
use crate::validate::{
    Findings, HttpProbe, Probe, UrlChecker, ValidationContext, Verdict, decide,
    validate_authored, validate_links,
};
use crate::{debug, log, utils::plural_count};

/// Result of a pipeline run.
pub struct Outcome {
    pub products: Vec<Product>,
    pub findings: Findings,
    /// Present when the api was written.
    pub api: Option<ApiSummary>,
}

impl Outcome {
    pub fn verdict(&self) -> Verdict {
        decide(&self.findings)
    }
}

/// One configured run over a set of products.
pub struct Pipeline<'a, P = HttpProbe> {
    ctx: ValidationContext,
    /// `None` disables URL checks.
    checker: Option<UrlChecker<P>>,
    enricher: &'a dyn Enrich,
    /// Api output directory, `None` to only validate.
    output: Option<PathBuf>,
}

impl<'a> Pipeline<'a, HttpProbe> {
    /// Pipeline for the configured run, evaluated on today's date.
    pub fn from_config(config: &SiteConfig, enricher: &'a dyn Enrich) -> Result<Self> {
        let checker = if config.validate.check_urls {
            Some(UrlChecker::from_config(&config.validate.urls)?)
        } else {
            None
        };
        Ok(Self::new(
            ValidationContext::today(&config.validate),
            checker,
            enricher,
        ))
    }
}

impl<'a, P: Probe> Pipeline<'a, P> {
    pub fn new(
        ctx: ValidationContext,
        checker: Option<UrlChecker<P>>,
        enricher: &'a dyn Enrich,
    ) -> Self {
        Self {
            ctx,
            checker,
            enricher,
            output: None,
        }
    }

    /// Also write the api to `output` after validation.
    pub fn with_output(mut self, output: &Path) -> Self {
        self.output = Some(output.to_path_buf());
        self
    }

    /// Load `files` and run every stage.
    pub fn run(&self, files: &[PathBuf], defaults: &Record) -> Result<Outcome> {
        let products = load_products(files, defaults)?;
        self.run_products(products)
    }

    /// Run every stage over already loaded products.
    pub fn run_products(&self, mut products: Vec<Product>) -> Result<Outcome> {
        let findings = Findings::new();

        log!(
            "validate";
            "validating {}",
            plural_count(products.len(), "product")
        );
        validate_authored(&products, &self.ctx, &findings);

        products
            .par_iter_mut()
            .for_each(|product| self.enricher.enrich(product));

        match &self.checker {
            Some(checker) => validate_links(&products, checker, &findings)?,
            None => debug!("urls"; "url checks disabled"),
        }

        let api = match &self.output {
            Some(output) => Some(build_api(&products, output)?),
            None => None,
        };

        Ok(Outcome {
            products,
            findings,
            api,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{UrlCheckConfig, ValidateConfig};
    use crate::product::{Value, parse_document};
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const PRODUCT: &str = r#"---
title: Demo
category: lang
permalink: /demo
releaseDateColumn: false
releaseColumn: false
eolColumn: true
releases:
  - releaseCycle: "1.0"
    eol: 2020-01-01
---
Demo.
"#;

    /// Records probed URLs, all reachable.
    #[derive(Default, Clone)]
    struct RecordingProbe {
        probed: Arc<Mutex<Vec<String>>>,
    }

    impl Probe for RecordingProbe {
        fn probe(&self, url: &str) -> Result<(), String> {
            self.probed.lock().push(url.to_string());
            Ok(())
        }
    }

    /// Adds a computed release link.
    struct LinkEnricher;

    impl Enrich for LinkEnricher {
        fn enrich(&self, product: &mut Product) {
            if let Some(Value::Array(releases)) = product.data.get_mut("releases") {
                for release in releases {
                    if let Value::Map(release) = release {
                        release.insert("link", Value::String("https://demo.example/1.0".into()));
                    }
                }
            }
        }
    }

    fn ctx() -> ValidationContext {
        ValidationContext::new(
            &ValidateConfig::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn defaults() -> Record {
        crate::config::DefaultsConfig::default().to_record().unwrap()
    }

    fn load(source: &str) -> Product {
        let mut product = parse_document("demo.md", source).unwrap().unwrap();
        product.apply_defaults(&defaults());
        product
    }

    #[test]
    fn test_enriched_urls_are_checked() {
        let probe = RecordingProbe::default();
        let checker = UrlChecker::new(probe.clone(), &UrlCheckConfig::default());
        let pipeline = Pipeline::new(ctx(), Some(checker), &LinkEnricher);
        let outcome = pipeline.run_products(vec![load(PRODUCT)]).unwrap();

        assert_eq!(outcome.verdict(), Verdict::Pass);
        assert_eq!(*probe.probed.lock(), ["https://demo.example/1.0"]);
    }

    #[test]
    fn test_authored_phase_sees_unenriched_data() {
        let source = PRODUCT.replace(
            "    eol: 2020-01-01\n",
            "    eol: 2020-01-01\n    link: not-a-url\n",
        );
        let pipeline: Pipeline<'_, RecordingProbe> = Pipeline::new(ctx(), None, &LinkEnricher);
        let outcome = pipeline.run_products(vec![load(&source)]).unwrap();

        assert_eq!(outcome.verdict(), Verdict::Fail { errors: 1 });
        let release = outcome.products[0].releases().next().unwrap();
        assert_eq!(
            release.get("link"),
            Some(&Value::String("https://demo.example/1.0".into()))
        );
    }

    #[test]
    fn test_run_writes_api_even_when_failing() {
        let dir = TempDir::new().unwrap();
        let products = dir.path().join("products");
        fs::create_dir_all(&products).unwrap();
        let file = products.join("demo.md");
        fs::write(&file, PRODUCT.replace("category: lang", "category: toy")).unwrap();

        let output = dir.path().join("api");
        let pipeline: Pipeline<'_, RecordingProbe> =
            Pipeline::new(ctx(), None, &NoEnrichment).with_output(&output);
        let outcome = pipeline.run(&[file], &defaults()).unwrap();

        assert_eq!(outcome.verdict(), Verdict::Fail { errors: 1 });
        assert_eq!(outcome.api.map(|api| api.releases), Some(1));
        assert!(output.join("demo/1.0.json").is_file());
        assert!(output.join("all.json").is_file());
    }

    #[test]
    fn test_validate_only_writes_nothing() {
        let pipeline: Pipeline<'_, RecordingProbe> = Pipeline::new(ctx(), None, &NoEnrichment);
        let outcome = pipeline.run_products(vec![load(PRODUCT)]).unwrap();
        assert!(outcome.api.is_none());
        assert!(outcome.findings.into_vec().is_empty());
    }
}
