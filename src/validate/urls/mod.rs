//! URL reachability checking.
//!
//! Every URL is first looked up in the ignore table (never probed), then
//! probed. A failed probe is looked up in the suppress table: matches become
//! warnings, everything else is a counted error. Both tables are ordered and
//! the first matching prefix wins.

mod content;
mod probe;

pub use content::extract_urls;
pub use probe::{HttpProbe, Probe};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::finding::{Finding, Findings, Kind, Severity};
use crate::config::{PrefixRule, UrlCheckConfig};
use crate::logger::ProgressLine;
use crate::product::{Product, Value};
use crate::{debug, log};

/// Product-level properties holding URLs.
const URL_PROPERTIES: [&str; 3] = ["releasePolicyLink", "releaseImage", "iconUrl"];

/// Outcome of checking one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStatus {
    Reachable,
    Unreachable(String),
    /// Matched the ignore table, not probed.
    Ignored(String),
    /// Failed, but matched the suppress table.
    Suppressed { failure: String, reason: String },
}

/// A URL found in a product, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTarget {
    pub product: String,
    pub release: Option<String>,
    pub property: String,
    pub url: String,
}

impl UrlTarget {
    /// Every URL of `product` subject to reachability checks.
    pub fn collect(product: &Product) -> Vec<Self> {
        let target = |release: Option<&Value>, property: &str, url: &str| Self {
            product: product.name.clone(),
            release: release.map(ToString::to_string),
            property: property.to_string(),
            url: url.trim().to_string(),
        };

        let mut targets = Vec::new();
        for property in URL_PROPERTIES {
            if let Some(value) = product.data.get_present(property) {
                targets.push(target(None, property, &value.to_string()));
            }
        }
        for url in extract_urls(&product.content) {
            targets.push(target(None, "content", &url));
        }
        for release in product.releases() {
            if let Some(link) = release.get_present("link") {
                targets.push(target(release.get("releaseCycle"), "link", &link.to_string()));
            }
        }
        targets
    }
}

// ============================================================================
// Checker
// ============================================================================

pub struct UrlChecker<P = HttpProbe> {
    probe: P,
    ignore: Vec<PrefixRule>,
    suppress: Vec<PrefixRule>,
    concurrency: usize,
}

impl UrlChecker<HttpProbe> {
    /// Checker probing over HTTP with the configured timeouts.
    pub fn from_config(config: &UrlCheckConfig) -> Result<Self> {
        Ok(Self::new(HttpProbe::new(config)?, config))
    }
}

impl<P: Probe> UrlChecker<P> {
    pub fn new(probe: P, config: &UrlCheckConfig) -> Self {
        Self {
            probe,
            ignore: config.ignore.clone(),
            suppress: config.suppress.clone(),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Check a single URL against the tables and the probe.
    pub fn check(&self, url: &str) -> UrlStatus {
        let url = url.trim();
        if let Some(rule) = find_prefix(&self.ignore, url) {
            return UrlStatus::Ignored(rule.reason.clone());
        }

        debug!("urls"; "checking {}", url);
        match self.probe.probe(url) {
            Ok(()) => UrlStatus::Reachable,
            Err(failure) => match find_prefix(&self.suppress, url) {
                Some(rule) => UrlStatus::Suppressed {
                    failure,
                    reason: rule.reason.clone(),
                },
                None => UrlStatus::Unreachable(failure),
            },
        }
    }

    /// Check every target on a bounded pool, recording failures.
    pub fn check_all(&self, targets: &[UrlTarget], findings: &Findings) -> Result<()> {
        if targets.is_empty() {
            return Ok(());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()
            .context("Failed to create URL check thread pool")?;

        let progress = ProgressLine::new("urls", &[("urls", targets.len())]);
        pool.install(|| {
            targets.par_iter().for_each(|target| {
                let status = self.check(&target.url);
                report(target, status, findings);
                progress.inc("urls");
            });
        });
        progress.finish();

        Ok(())
    }
}

fn find_prefix<'a>(rules: &'a [PrefixRule], url: &str) -> Option<&'a PrefixRule> {
    rules.iter().find(|rule| url.starts_with(rule.prefix.as_str()))
}

/// Turn a check result into a finding or a log line.
fn report(target: &UrlTarget, status: UrlStatus, findings: &Findings) {
    let (severity, message) = match status {
        UrlStatus::Reachable => return,
        UrlStatus::Ignored(reason) => {
            log!("warning"; "ignore URL {} : {}", target.url, reason);
            return;
        }
        UrlStatus::Unreachable(failure) => (Severity::Error, format!("got an error: '{failure}'")),
        UrlStatus::Suppressed { failure, reason } => (
            Severity::Warning,
            format!("got an error: '{failure}' (suppressed: {reason})"),
        ),
    };

    findings.record(Finding {
        kind: Kind::Reachability,
        severity,
        property: target.property.clone(),
        value: target.url.clone(),
        product: target.product.clone(),
        release: target.release.clone(),
        message,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Record;
    use parking_lot::Mutex;

    /// Fails every URL containing "broken", remembers what was probed.
    #[derive(Default)]
    struct FakeProbe {
        probed: Mutex<Vec<String>>,
    }

    impl Probe for FakeProbe {
        fn probe(&self, url: &str) -> Result<(), String> {
            self.probed.lock().push(url.to_string());
            if url.contains("broken") {
                Err("response code is 404".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn checker() -> UrlChecker<FakeProbe> {
        let config = UrlCheckConfig {
            ignore: vec![PrefixRule::new("https://ignored.example", "always times out")],
            suppress: vec![
                PrefixRule::new("https://flaky.example/broken", "first"),
                PrefixRule::new("https://flaky.example", "second"),
            ],
            concurrency: 2,
            ..UrlCheckConfig::default()
        };
        UrlChecker::new(FakeProbe::default(), &config)
    }

    fn target(url: &str) -> UrlTarget {
        UrlTarget {
            product: "demo.md".to_string(),
            release: None,
            property: "releasePolicyLink".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_check_statuses() {
        let checker = checker();
        assert_eq!(checker.check(" https://ok.example "), UrlStatus::Reachable);
        assert_eq!(
            checker.check("https://ok.example/broken"),
            UrlStatus::Unreachable("response code is 404".to_string())
        );
        assert_eq!(
            checker.check("https://ignored.example/broken"),
            UrlStatus::Ignored("always times out".to_string())
        );
        assert_eq!(
            checker.check("https://flaky.example/broken/page"),
            UrlStatus::Suppressed {
                failure: "response code is 404".to_string(),
                reason: "first".to_string(),
            }
        );
        assert_eq!(checker.check("https://flaky.example/fine"), UrlStatus::Reachable);
    }

    #[test]
    fn test_ignored_never_probed() {
        let checker = checker();
        checker.check("https://ignored.example/anything");
        assert!(checker.probe.probed.lock().is_empty());

        checker.check("  https://ok.example/page\n");
        assert_eq!(*checker.probe.probed.lock(), ["https://ok.example/page"]);
    }

    #[test]
    fn test_check_all_counts_only_unsuppressed() {
        let checker = checker();
        let findings = Findings::new();
        let targets = [
            target("https://ok.example/"),
            target("https://ok.example/broken"),
            target("https://ignored.example/broken"),
            target("https://flaky.example/broken"),
        ];
        checker.check_all(&targets, &findings).unwrap();

        assert_eq!(findings.error_count(), 1);
        let found = findings.into_vec();
        assert_eq!(found.len(), 2);

        let error = found.iter().find(|f| f.is_error()).unwrap();
        assert_eq!(error.value, "https://ok.example/broken");
        assert_eq!(error.message, "got an error: 'response code is 404'");

        let warning = found.iter().find(|f| !f.is_error()).unwrap();
        assert_eq!(
            warning.message,
            "got an error: 'response code is 404' (suppressed: first)"
        );
    }

    #[test]
    fn test_collect_targets() {
        let release = |cycle: &str, link: Value| -> Value {
            Value::Map(
                [("releaseCycle", Value::String(cycle.into())), ("link", link)]
                    .into_iter()
                    .collect(),
            )
        };
        let data: Record = [
            (
                "releasePolicyLink",
                Value::String("https://demo.example/policy\n".into()),
            ),
            ("iconUrl", Value::Null),
            (
                "releases",
                Value::Array(vec![
                    release("2.0", Value::String("https://demo.example/2.0".into())),
                    release("1.0", Value::Null),
                ]),
            ),
        ]
        .into_iter()
        .collect();
        let product = Product::new(
            "demo.md",
            data,
            "Read the [notes](https://demo.example/notes).",
        );

        let targets = UrlTarget::collect(&product);
        let found: Vec<_> = targets
            .iter()
            .map(|t| (t.property.as_str(), t.release.as_deref(), t.url.as_str()))
            .collect();
        assert_eq!(
            found,
            [
                ("releasePolicyLink", None, "https://demo.example/policy"),
                ("content", None, "https://demo.example/notes"),
                ("link", Some("2.0"), "https://demo.example/2.0"),
            ]
        );
    }
}
