//! JSON report formatter.

use serde::Serialize;
use std::io::Write;

use super::ReportFormatter;
use crate::validate::{CheckStatus, ValidationReport};

/// Formats a report as JSON for tooling integration.
#[derive(Default)]
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a ValidationReport,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    passed: usize,
    warnings: usize,
    failed: usize,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(&self, report: &ValidationReport, writer: &mut W) -> std::io::Result<()> {
        let output = JsonOutput {
            report,
            summary: JsonSummary {
                total: report.outcomes.len(),
                passed: report.count(CheckStatus::Pass),
                warnings: report.count(CheckStatus::Warning),
                failed: report.count(CheckStatus::Fail),
            },
        };
        serde_json::to_writer_pretty(writer, &output).map_err(std::io::Error::other)?;
        Ok(())
    }
}
