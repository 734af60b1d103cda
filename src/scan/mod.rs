//! Duplication scanning.
//!
//! Walks the legacy per-template directories and builds a
//! [`DuplicateRecord`]: section kind to every template that implements it.

pub mod record;
pub mod scanner;

pub use record::{DuplicateRecord, SourceLocation};
pub use scanner::{RootStatus, ScanReport, Scanner, SectionFile, TemplateInventory};
