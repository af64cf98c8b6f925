//! Predicates applied to a single property of a product or release record.
//!
//! Each predicate records a [`Finding`] on failure and returns; nothing here
//! aborts, so one pass surfaces every problem in a document.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use super::finding::{Finding, Findings, Kind, Severity};
use crate::product::{Product, Record, Value};

pub static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://.+$").unwrap());

static MISSING: Value = Value::Null;

/// Checks properties of one record on behalf of one product.
pub struct Checker<'a> {
    product: &'a Product,
    data: &'a Record,
    release: Option<&'a Value>,
    findings: &'a Findings,
}

impl<'a> Checker<'a> {
    /// Checker for product-level properties.
    pub fn product(product: &'a Product, findings: &'a Findings) -> Self {
        Self {
            product,
            data: &product.data,
            release: None,
            findings,
        }
    }

    /// Checker for the properties of one release of `product`.
    pub fn release(product: &'a Product, release: &'a Record, findings: &'a Findings) -> Self {
        Self {
            product,
            data: release,
            release: release.get("releaseCycle"),
            findings,
        }
    }

    /// Property value, `Null` when absent.
    fn value(&self, property: &str) -> &'a Value {
        self.data.get(property).unwrap_or(&MISSING)
    }

    pub fn is_string(&self, property: &str) {
        let value = self.value(property);
        if value.as_str().is_none() {
            self.schema_error(
                property,
                value,
                format!("expecting a value of type string, got {}", value.kind()),
            );
        }
    }

    pub fn is_number(&self, property: &str) {
        let value = self.value(property);
        if !matches!(value, Value::Number(_)) {
            self.schema_error(
                property,
                value,
                format!("expecting a value of type number, got {}", value.kind()),
            );
        }
    }

    pub fn is_array(&self, property: &str) {
        let value = self.value(property);
        if value.as_array().is_none() {
            self.schema_error(
                property,
                value,
                format!("expecting an array, got {}", value.kind()),
            );
        }
    }

    pub fn is_one_of(&self, property: &str, valid: &[String]) {
        let value = self.value(property);
        let found = value
            .as_str()
            .is_some_and(|s| valid.iter().any(|v| v == s));
        if !found {
            self.schema_error(
                property,
                value,
                format!("expecting one of {}", valid.join(", ")),
            );
        }
    }

    /// Match a string, or every element of an array, against `re`.
    pub fn matches(&self, property: &str, re: &Regex) {
        let value = self.value(property);
        let values = match value {
            Value::Array(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };

        for value in values {
            if !value.as_str().is_some_and(|s| re.is_match(s)) {
                self.schema_error(property, value, format!("should match {}", re.as_str()));
            }
        }
    }

    pub fn is_url(&self, property: &str) {
        self.matches(property, &RE_URL);
    }

    pub fn is_date(&self, property: &str) {
        let value = self.value(property);
        if value.as_date().is_none() {
            self.schema_error(
                property,
                value,
                format!("expecting a value of type date, got {}", value.kind()),
            );
        }
    }

    pub fn is_boolean_or_date(&self, property: &str) {
        let value = self.value(property);
        if value.as_bool_or_date().is_none() {
            self.schema_error(
                property,
                value,
                format!(
                    "expecting a value of type boolean or date, got {}",
                    value.kind()
                ),
            );
        }
    }

    pub fn is_boolean_or_string(&self, property: &str) {
        let value = self.value(property);
        if value.as_column_flag().is_none() {
            self.schema_error(
                property,
                value,
                format!(
                    "expecting a value of type boolean or string, got {}",
                    value.kind()
                ),
            );
        }
    }

    /// Flag dates later than `today + days`. Non-date values are left to `is_date`.
    pub fn too_far_in_future(&self, property: &str, today: NaiveDate, days: u32) {
        let value = self.value(property);
        let Some(date) = value.as_date() else {
            return;
        };
        let Some(limit) = today.checked_add_days(Days::new(u64::from(days))) else {
            return;
        };
        if date > limit {
            self.record(
                Kind::Temporal,
                Severity::Error,
                property,
                value.to_string(),
                format!("expecting a value in the next {days} days, got {value}"),
            );
        }
    }

    /// Report an element that is not a release mapping.
    pub fn not_a_release(&self, value: &Value) {
        self.schema_error(
            "releases",
            value,
            format!("expecting a map for each release, got {}", value.kind()),
        );
    }

    fn schema_error(&self, property: &str, value: &Value, message: String) {
        self.record(
            Kind::Schema,
            Severity::Error,
            property,
            value.to_string(),
            message,
        );
    }

    pub fn record(
        &self,
        kind: Kind,
        severity: Severity,
        property: &str,
        value: String,
        message: String,
    ) {
        self.findings.record(Finding {
            kind,
            severity,
            property: property.to_string(),
            value,
            product: self.product.name.clone(),
            release: self.release.map(ToString::to_string),
            message,
        });
    }
}
