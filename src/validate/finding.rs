//! Validation findings and the run-level decision.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::debug;

/// Category of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Type, format or enum mismatch.
    Schema,
    /// Date too far in the future.
    Temporal,
    /// URL responded with an error status or could not be fetched.
    Reachability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Counted, fails the run.
    Error,
    /// Reported only.
    Warning,
}

/// One problem found in a product or one of its releases.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: Kind,
    pub severity: Severity,
    pub property: String,
    /// Offending value as written in the document.
    pub value: String,
    /// Product document name.
    pub product: String,
    /// Release cycle, when the finding is about a release.
    pub release: Option<String>,
    pub message: String,
}

impl Finding {
    /// `name` or `name#cycle`.
    pub fn location(&self) -> String {
        match &self.release {
            Some(cycle) => format!("{}#{}", self.product, cycle),
            None => self.product.clone(),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}' for {}, {}.",
            self.property,
            self.value,
            self.location(),
            self.message
        )
    }
}

// ============================================================================
// Findings
// ============================================================================

/// Thread-safe collector passed to every check.
///
/// The error counter only ever grows, so it can be read at any point of a
/// run and always reflects what has been recorded so far.
#[derive(Debug, Default)]
pub struct Findings {
    items: Mutex<Vec<Finding>>,
    errors: AtomicUsize,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, finding: Finding) {
        debug!("validate"; "{}", finding);
        if finding.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.items.lock().push(finding);
    }

    /// Number of errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn into_vec(self) -> Vec<Finding> {
        self.items.into_inner()
    }
}

// ============================================================================
// Decision
// ============================================================================

/// Outcome of a full validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail { errors: usize },
}

/// Decide once, after every product has been checked.
pub fn decide(findings: &Findings) -> Verdict {
    match findings.error_count() {
        0 => Verdict::Pass,
        errors => Verdict::Fail { errors },
    }
}
