//! Validation report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::log;
use crate::pipeline::Outcome;
use crate::utils::{plural_count, plural_s};
use crate::validate::{Finding, Verdict};

/// Findings of a run grouped by product document.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Counted problems, grouped by product.
    pub errors: BTreeMap<String, Vec<Finding>>,
    /// Suppressed problems, grouped by product.
    pub warnings: BTreeMap<String, Vec<Finding>>,
}

impl ValidationReport {
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut report = Self::default();
        for finding in findings {
            let group = if finding.is_error() {
                &mut report.errors
            } else {
                &mut report.warnings
            };
            group.entry(finding.product.clone()).or_default().push(finding);
        }

        // URL checks finish in any order
        for list in report.errors.values_mut().chain(report.warnings.values_mut()) {
            list.sort_by(|a, b| {
                (&a.release, &a.property, &a.value).cmp(&(&b.release, &b.property, &b.value))
            });
        }
        report
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(Vec::len).sum()
    }

    /// Print the full report to stderr (warnings -> errors).
    pub fn print(&self) {
        print_section("warnings", &self.warnings, false);
        print_section("errors", &self.errors, true);
    }
}

/// Print section with one block per product.
fn print_section(name: &str, groups: &BTreeMap<String, Vec<Finding>>, is_error: bool) {
    if groups.is_empty() {
        return;
    }
    eprintln!();

    let product_count = groups.len();
    let count: usize = groups.values().map(Vec::len).sum();
    let title = if is_error {
        name.red().bold().to_string()
    } else {
        name.magenta().bold().to_string()
    };

    // Section header
    eprintln!(
        "{} {}",
        title,
        format!(
            "({}, {} problem{})",
            plural_count(product_count, "product"),
            count,
            plural_s(count)
        )
        .dimmed()
    );

    for (product, findings) in groups {
        eprintln!("{}{}{}", "[".dimmed(), product.cyan(), "]".dimmed());
        for f in findings {
            let arrow = if is_error {
                "→".red().to_string()
            } else {
                "→".magenta().to_string()
            };
            let cycle = f
                .release
                .as_ref()
                .map(|cycle| format!("#{cycle} "))
                .unwrap_or_default();
            eprintln!(
                "{} {}{} '{}' {}",
                arrow,
                cycle.dimmed(),
                f.property.bold(),
                f.value,
                f.message
            );
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.error_count();
        let warnings = self.warning_count();

        if errors == 0 && warnings == 0 {
            return write!(f, "{}", "all checks passed".green());
        }
        if errors == 0 {
            return write!(
                f,
                "{} {}",
                "all checks passed,".green(),
                plural_count(warnings, "warning").dimmed()
            );
        }
        write!(
            f,
            "{} {} {}",
            "found".dimmed(),
            errors.to_string().red().bold(),
            format!("error{}", plural_s(errors)).dimmed()
        )?;
        if warnings > 0 {
            write!(f, "{}", format!(", {}", plural_count(warnings, "warning")).dimmed())?;
        }
        Ok(())
    }
}

/// Print the report of `outcome` and fail when it has errors.
///
/// `action` names what is canceled, e.g. `"build canceled"`.
pub fn conclude(outcome: Outcome, action: &str) -> Result<()> {
    let verdict = outcome.verdict();
    let report = ValidationReport::from_findings(outcome.findings.into_vec());

    report.print();
    log!(
        "validate";
        "{} checked: {}",
        plural_count(outcome.products.len(), "product"),
        report
    );

    match verdict {
        Verdict::Pass => Ok(()),
        Verdict::Fail { errors } => {
            anyhow::bail!("{action}: {} detected", plural_count(errors, "error"))
        }
    }
}
