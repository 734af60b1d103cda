//! Post-migration validation and grading.
//!
//! The validation engine consists of:
//!
//! - **Checks** - Individual inspections of the migrated tree ([`Check`] trait)
//! - **Registry** - The ordered set of checks to run ([`CheckRegistry`])
//! - **Report** - Weighted score, letter grade and per-category tallies ([`ValidationReport`])
//!
//! # Example
//!
//! ```
//! use storeforge::config::Settings;
//! use storeforge::validate::{CheckRegistry, Grade, ValidationContext};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let ctx = ValidationContext::load(temp.path(), &Settings::default());
//! let report = CheckRegistry::with_builtins().run(&ctx);
//!
//! // Nothing has been migrated yet
//! assert_eq!(report.grade, Grade::F);
//! assert!(!report.meets(Grade::C));
//! ```

pub mod check;
pub mod checks;
pub mod output;
pub mod registry;
pub mod report;

pub use check::{Category, Check, CheckId, CheckResult, CheckStatus, ValidationContext};
pub use checks::missing_core_sections;
pub use output::{HumanFormatter, JsonFormatter, ReportFormat, ReportFormatter};
pub use registry::CheckRegistry;
pub use report::{CategoryScore, CheckOutcome, Grade, ValidationReport};
