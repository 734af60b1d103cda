//! Human-readable report formatter.

use console::Style;
use std::io::Write;

use super::ReportFormatter;
use crate::validate::{CheckStatus, ValidationReport};

/// Formats a report for terminal display with optional color support.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
}

impl HumanFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn status_mark(&self, status: CheckStatus) -> String {
        let (mark, style) = match status {
            CheckStatus::Pass => ("✓", Style::new().green()),
            CheckStatus::Warning => ("!", Style::new().yellow()),
            CheckStatus::Fail => ("✗", Style::new().red()),
        };
        if self.use_color {
            style.apply_to(mark).to_string()
        } else {
            mark.to_string()
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(&self, report: &ValidationReport, writer: &mut W) -> std::io::Result<()> {
        for category in &report.categories {
            writeln!(
                writer,
                "{} ({}/{} passed)",
                category.category, category.passed, category.total
            )?;
            for outcome in report
                .outcomes
                .iter()
                .filter(|o| o.category == category.category)
            {
                writeln!(
                    writer,
                    "  {} {}: {}",
                    self.status_mark(outcome.status),
                    outcome.name,
                    outcome.message
                )?;
                if outcome.status != CheckStatus::Pass {
                    if let Some(ref remediation) = outcome.remediation {
                        writeln!(writer, "      = help: {}", remediation)?;
                    }
                }
            }
            writeln!(writer)?;
        }

        writeln!(
            writer,
            "Score {}/100, grade {} ({} passed, {} warning(s), {} failed)",
            report.score,
            report.grade,
            report.count(CheckStatus::Pass),
            report.count(CheckStatus::Warning),
            report.count(CheckStatus::Fail)
        )?;

        Ok(())
    }
}
