//! Duplicate records.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where one implementation of a section kind lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Template directory name (e.g. `home-electronic`).
    pub source_template: String,
    /// Path of the implementation file.
    pub file_path: PathBuf,
}

/// Reverse index from section kind to every place it is implemented.
///
/// Kinds are keyed by file stem (`Hero`). Locations keep directory
/// enumeration order. Only kinds with at least two locations are duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateRecord {
    entries: BTreeMap<String, Vec<SourceLocation>>,
}

impl DuplicateRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one implementation of `kind`.
    pub fn add(&mut self, kind: &str, location: SourceLocation) {
        self.entries.entry(kind.to_string()).or_default().push(location);
    }

    /// Every location of a kind, duplicate or not.
    pub fn get(&self, kind: &str) -> Option<&[SourceLocation]> {
        self.entries.get(kind).map(|v| v.as_slice())
    }

    /// Kinds found in two or more template directories, sorted by kind.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[SourceLocation])> {
        self.entries
            .iter()
            .filter(|(_, locations)| locations.len() >= 2)
            .map(|(kind, locations)| (kind.as_str(), locations.as_slice()))
    }

    /// Number of duplicated kinds.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates().count()
    }

    /// Kinds found in exactly one template directory.
    pub fn unique_kinds(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, locations)| locations.len() == 1)
            .map(|(kind, _)| kind.as_str())
            .collect()
    }

    /// Every kind seen, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Number of distinct kinds seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
