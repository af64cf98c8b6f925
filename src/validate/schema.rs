//! Field bindings for product and release records.

use std::sync::LazyLock;

use regex::Regex;

use super::ValidationContext;
use super::finding::Findings;
use super::rules::Checker;
use crate::product::{Product, Release, Value};

static RE_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9\-]+( [a-z0-9\-]+)*$").unwrap());
static RE_PERMALINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/[a-z0-9-]+$").unwrap());
static RE_ALTERNATE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[a-z0-9\-_]+$").unwrap());

/// Column flags, in authored-document order.
const COLUMN_FLAGS: [&str; 6] = [
    "eolColumn",
    "activeSupportColumn",
    "releaseColumn",
    "releaseDateColumn",
    "discontinuedColumn",
    "extendedSupportColumn",
];

const WARN_THRESHOLDS: [&str; 4] = [
    "eolWarnThreshold",
    "activeSupportWarnThreshold",
    "discontinuedWarnThreshold",
    "extendedSupportWarnThreshold",
];

/// Release fields switched on by a product column flag.
const COLUMN_FIELDS: [(&str, &str); 4] = [
    ("activeSupportColumn", "support"),
    ("eolColumn", "eol"),
    ("discontinuedColumn", "discontinued"),
    ("extendedSupportColumn", "extendedSupport"),
];

/// Validate the authored fields of a product and all of its releases.
pub fn check_product(product: &Product, ctx: &ValidationContext, findings: &Findings) {
    let data = &product.data;
    let check = Checker::product(product, findings);

    check.is_string("title");
    check.is_one_of("category", &ctx.categories);
    if data.contains_key("tags") {
        check.matches("tags", &RE_TAGS);
    }
    check.matches("permalink", &RE_PERMALINK);
    check.matches("alternate_urls", &RE_ALTERNATE_URL);
    if data.contains_key("versionCommand") {
        check.is_string("versionCommand");
    }
    for property in ["releasePolicyLink", "releaseImage", "changelogTemplate"] {
        if data.contains_key(property) {
            check.is_url(property);
        }
    }
    if data.contains_key("releaseLabel") {
        check.is_string("releaseLabel");
    }
    check.is_string("LTSLabel");
    for flag in COLUMN_FLAGS {
        check.is_boolean_or_string(flag);
    }
    for threshold in WARN_THRESHOLDS {
        check.is_number(threshold);
    }
    check.is_array("auto");
    check.is_array("identifiers");
    check.is_array("releases");

    let Some(releases) = data.get("releases").and_then(Value::as_array) else {
        return;
    };
    for release in releases {
        match release.as_map() {
            Some(release) => check_release(product, release, ctx, findings),
            None => check.not_a_release(release),
        }
    }
}

fn check_release(
    product: &Product,
    release: &Release,
    ctx: &ValidationContext,
    findings: &Findings,
) {
    let check = Checker::release(product, release, findings);

    check.is_string("releaseCycle");
    for property in ["releaseLabel", "codename"] {
        if release.contains_key(property) {
            check.is_string(property);
        }
    }
    if product.column_enabled("releaseDateColumn") {
        check.is_date("releaseDate");
        check.too_far_in_future("releaseDate", ctx.today, ctx.future_days);
    }
    for (flag, property) in COLUMN_FIELDS {
        if product.column_enabled(flag) {
            check.is_boolean_or_date(property);
        }
    }
    if release.contains_key("lts") {
        check.is_boolean_or_date("lts");
    }
    if product.column_enabled("releaseColumn") {
        check.is_string("latest");
        if release.contains_key("latestReleaseDate") {
            check.is_date("latestReleaseDate");
        }
    }
    if release.get_present("link").is_some() {
        check.is_url("link");
    }
}
