//! `[validate]` section configuration.
//!
//! Configuration for the product data validator and the URL reachability checker.
//!
//! # Example
//!
//! ```toml
//! [validate]
//! check_urls = false          # Probe every URL (slow, also enabled by MUST_CHECK_URLS)
//! future_days = 30            # How far in the future a releaseDate may be
//! categories = ["lang", "os"] # Allowed product categories
//!
//! [validate.urls]
//! user_agent = "Mozilla/5.0 ..."
//! connect_timeout = 3         # Seconds
//! read_timeout = 10           # Seconds
//! concurrency = 8             # Max concurrent HTTP requests
//!
//! [[validate.urls.ignore]]    # Never probed
//! prefix = "https://www.nokia.com"
//! reason = "always return a read timeout"
//!
//! [[validate.urls.suppress]]  # Probed, failures downgraded to warnings
//! prefix = "https://web.archive.org"
//! reason = "may trigger an open or read timeout"
//! ```
//!
//! Setting `ignore` or `suppress` replaces the corresponding built-in table.

use serde::{Deserialize, Serialize};

/// Product categories accepted by default.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "app",
    "db",
    "device",
    "framework",
    "lang",
    "library",
    "os",
    "server-app",
    "service",
    "standard",
];

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64; rv:47.0) Gecko/20100101 Firefox/47.0";

// ============================================================================
// Main ValidateConfig
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Probe URLs for reachability after enrichment.
    pub check_urls: bool,

    /// Maximum number of days a `releaseDate` may lie in the future.
    pub future_days: u32,

    /// Allowed values for the product `category`.
    pub categories: Vec<String>,

    /// URL reachability settings.
    pub urls: UrlCheckConfig,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            check_urls: false,
            future_days: 30,
            categories: DEFAULT_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
            urls: UrlCheckConfig::default(),
        }
    }
}

// ============================================================================
// URL checking
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlCheckConfig {
    /// User-Agent header sent with every probe.
    pub user_agent: String,

    /// Connection timeout in seconds.
    pub connect_timeout: u64,

    /// Response timeout in seconds.
    pub read_timeout: u64,

    /// Maximum number of concurrent HTTP requests.
    pub concurrency: usize,

    /// URL prefixes that are never probed.
    pub ignore: Vec<PrefixRule>,

    /// URL prefixes whose failures are reported as warnings.
    pub suppress: Vec<PrefixRule>,
}

impl Default for UrlCheckConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: 3,
            read_timeout: 10,
            concurrency: 8,
            ignore: builtin::ignored(),
            suppress: builtin::suppressed(),
        }
    }
}

/// A URL prefix and the human reason it is treated specially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub reason: String,
}

impl PrefixRule {
    pub fn new(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }
}

/// Endpoints known to misbehave when probed from CI.
mod builtin {
    use super::PrefixRule;

    const BECAUSE_403: &str = "may trigger a 403 Forbidden or a redirection forbidden";
    const BECAUSE_502: &str = "may return a 502 Bad Gateway";
    const BECAUSE_503: &str = "may return a 503 Service Unavailable";
    const BECAUSE_TIMEOUT: &str = "may trigger an open or read timeout";
    const BECAUSE_EOF: &str = "may return an \"unexpected eof while reading\" error";
    const BECAUSE_CERT: &str = "site have an invalid certificate";
    const BECAUSE_UNAVAILABLE: &str = "site is temporary unavailable";

    pub fn ignored() -> Vec<PrefixRule> {
        vec![PrefixRule::new(
            "https://www.nokia.com",
            "always return a read timeout",
        )]
    }

    pub fn suppressed() -> Vec<PrefixRule> {
        [
            ("https://ark.intel.com", BECAUSE_403),
            ("https://azure.microsoft.com", BECAUSE_TIMEOUT),
            ("https://business.adobe.com", BECAUSE_TIMEOUT),
            ("https://blogs.oracle.com", BECAUSE_TIMEOUT),
            ("https://codex.wordpress.org/Supported_Versions", BECAUSE_EOF),
            ("https://dev.mysql.com", BECAUSE_403),
            ("https://docs.clamav.net", BECAUSE_403),
            ("https://docs-prv.pcisecuritystandards.org", BECAUSE_403),
            ("https://dragonwell-jdk.io/", BECAUSE_UNAVAILABLE),
            ("https://euro-linux.com", BECAUSE_403),
            (
                "https://github.com/angular/angular.js/blob/v1.6.10/CHANGELOG.md",
                BECAUSE_502,
            ),
            (
                "https://github.com/ansible-community/ansible-build-data/blob/main/4/CHANGELOG-v4.rst",
                BECAUSE_502,
            ),
            (
                "https://github.com/nodejs/node/blob/main/doc/changelogs/",
                BECAUSE_502,
            ),
            ("https://make.wordpress.org", BECAUSE_EOF),
            ("https://mirrors.slackware.com", BECAUSE_403),
            ("https://opensource.org/licenses/osl-3.0.php", BECAUSE_403),
            ("https://reload4j.qos.ch/", BECAUSE_TIMEOUT),
            ("https://support.azul.com", BECAUSE_403),
            ("https://support.fairphone.com", BECAUSE_403),
            ("https://web.archive.org", BECAUSE_TIMEOUT),
            ("https://wiki.debian.org", BECAUSE_TIMEOUT),
            ("https://wordpress.org", BECAUSE_EOF),
            (
                "https://www.amazon.com/gp/help/customer/display.html",
                BECAUSE_403,
            ),
            ("https://www.amazon.com/Kindle10Notes", BECAUSE_503),
            ("https://www.amazon.com/Voyage7Notes", BECAUSE_503),
            ("https://www.atlassian.com", BECAUSE_TIMEOUT),
            ("https://www.adobe.com", BECAUSE_TIMEOUT),
            (
                "https://www.citrix.com/products/citrix-virtual-apps-and-desktops/",
                BECAUSE_403,
            ),
            ("https://www.clamav.net", BECAUSE_403),
            ("https://www.drupal.org/", BECAUSE_403),
            ("https://www.intel.com", BECAUSE_403),
            ("https://www.java.com/releases/", BECAUSE_TIMEOUT),
            (
                "https://www.microfocus.com/documentation/visual-cobol/",
                BECAUSE_TIMEOUT,
            ),
            (
                "https://www.microsoft.com/download/internet-explorer.aspx",
                BECAUSE_TIMEOUT,
            ),
            ("https://www.microsoft.com/edge", BECAUSE_TIMEOUT),
            ("https://www.microsoft.com/windows", BECAUSE_TIMEOUT),
            ("https://www.mysql.com", BECAUSE_403),
            ("https://xenserver.org/", BECAUSE_CERT),
        ]
        .into_iter()
        .map(|(prefix, reason)| PrefixRule::new(prefix, reason))
        .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SiteConfig, test_parse_config};

    #[test]
    fn test_validate_config_defaults() {
        let config = test_parse_config("");
        assert!(!config.validate.check_urls);
        assert_eq!(config.validate.future_days, 30);
        assert_eq!(config.validate.categories.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(config.validate.urls.connect_timeout, 3);
        assert_eq!(config.validate.urls.read_timeout, 10);
        assert_eq!(config.validate.urls.ignore.len(), 1);
        assert!(
            config
                .validate
                .urls
                .suppress
                .iter()
                .any(|r| r.prefix == "https://web.archive.org")
        );
    }

    #[test]
    fn test_validate_config_custom() {
        let config = test_parse_config(
            r#"[validate]
check_urls = true
future_days = 7
categories = ["lang"]

[validate.urls]
concurrency = 2
read_timeout = 5

[[validate.urls.ignore]]
prefix = "http://localhost"
reason = "local"

[[validate.urls.suppress]]
prefix = "https://flaky.example"
reason = "flaky"
"#,
        );
        assert!(config.validate.check_urls);
        assert_eq!(config.validate.future_days, 7);
        assert_eq!(config.validate.categories, ["lang"]);
        assert_eq!(config.validate.urls.concurrency, 2);
        assert_eq!(config.validate.urls.read_timeout, 5);
        assert_eq!(config.validate.urls.connect_timeout, 3);
        assert_eq!(
            config.validate.urls.ignore,
            [PrefixRule::new("http://localhost", "local")]
        );
        assert_eq!(
            config.validate.urls.suppress,
            [PrefixRule::new("https://flaky.example", "flaky")]
        );
    }

    #[test]
    fn test_validate_unknown_field_detected() {
        let content = "[validate]\nunknown = \"field\"";
        let (_, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.iter().any(|f| f.contains("unknown")));
    }
}
