//! Report formatters.
//!
//! This module provides formatters for writing a [`ValidationReport`]
//! in different formats (human-readable, JSON).

pub mod human;
pub mod json;

use crate::validate::ValidationReport;
use std::io::Write;

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Human,
    Json,
}

/// Trait for formatting a validation report.
pub trait ReportFormatter {
    /// Format the report to the given writer.
    fn format<W: Write>(&self, report: &ValidationReport, writer: &mut W) -> std::io::Result<()>;
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
