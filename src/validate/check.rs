//! Check definitions.
//!
//! This module provides the core types for post-migration checks:
//!
//! - [`Check`] - The trait every check implements
//! - [`CheckStatus`] - Pass, Warning or Fail
//! - [`ValidationContext`] - The tree and configuration snapshot checks run against

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::components::ComponentRegistry;
use crate::config::Settings;
use crate::scan::Scanner;
use crate::store::TemplateStore;

/// Unique identifier for a check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CheckId(pub String);

impl CheckId {
    /// Create a new check ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl CheckStatus {
    /// Share of the check's weight this status earns.
    pub fn credit(&self) -> f64 {
        match self {
            CheckStatus::Pass => 1.0,
            CheckStatus::Warning => 0.5,
            CheckStatus::Fail => 0.0,
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "pass"),
            CheckStatus::Warning => write!(f, "warning"),
            CheckStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Report category a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Shape of the file tree.
    Structure,
    /// The template configuration artifact.
    Configuration,
    /// The unified component catalog.
    Components,
    /// Code that consumes the registry.
    Integration,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Structure => write!(f, "Structure"),
            Category::Configuration => write!(f, "Configuration"),
            Category::Components => write!(f, "Components"),
            Category::Integration => write!(f, "Integration"),
        }
    }
}

/// What a check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
    /// How to fix it, for warnings and failures.
    pub remediation: Option<String>,
}

impl CheckResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
            remediation: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            message: message.into(),
            remediation: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
            remediation: None,
        }
    }

    /// Add remediation guidance.
    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

/// A post-migration check.
///
/// Checks only read the [`ValidationContext`]; a failing check never stops
/// the others from running.
pub trait Check: Send + Sync {
    /// Unique identifier for this check.
    fn id(&self) -> CheckId;

    /// Human-readable name of the check.
    fn name(&self) -> &str;

    /// Report category.
    fn category(&self) -> Category;

    /// Relative weight in the overall score.
    fn weight(&self) -> u32 {
        1
    }

    /// Run the check.
    fn run(&self, ctx: &ValidationContext) -> CheckResult;
}

/// Snapshot of a template root taken once before the checks run.
#[derive(Debug)]
pub struct ValidationContext {
    pub root: PathBuf,
    pub settings: Settings,
    /// Whether the canonical directory exists.
    pub canonical_exists: bool,
    /// Registry built from the canonical directory.
    pub registry: ComponentRegistry,
    /// Whether the configuration artifact exists.
    pub config_exists: bool,
    /// The parsed configuration artifact, or why it could not be loaded.
    pub store: std::result::Result<TemplateStore, String>,
    /// Legacy template directories still on disk.
    pub legacy_dirs: Vec<String>,
    /// Export manifest content, if the file exists.
    pub export_manifest: Option<String>,
}

impl ValidationContext {
    /// Load a snapshot of `root`. Never fails; problems are captured for
    /// the checks to report.
    pub fn load(root: &Path, settings: &Settings) -> Self {
        let canonical_exists = settings.canonical_path(root).is_dir();

        let registry = ComponentRegistry::from_canonical_dir(root, settings).unwrap_or_else(|e| {
            tracing::warn!("Cannot read canonical directory: {}", e);
            ComponentRegistry::new()
        });

        let config_path = settings.config_path(root);
        let config_exists = config_path.is_file();
        let store = TemplateStore::load(&config_path).map_err(|e| e.to_string());

        let legacy_dirs = Scanner::new(settings)
            .template_dirs(root)
            .map(|dirs| dirs.into_iter().map(|(name, _)| name).collect())
            .unwrap_or_default();

        let export_manifest = fs::read_to_string(settings.export_manifest_path(root)).ok();

        Self {
            root: root.to_path_buf(),
            settings: settings.clone(),
            canonical_exists,
            registry,
            config_exists,
            store,
            legacy_dirs,
            export_manifest,
        }
    }

    /// The configuration store, if it loaded.
    pub fn store(&self) -> Option<&TemplateStore> {
        self.store.as_ref().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn status_credit() {
        assert_eq!(CheckStatus::Pass.credit(), 1.0);
        assert_eq!(CheckStatus::Warning.credit(), 0.5);
        assert_eq!(CheckStatus::Fail.credit(), 0.0);
    }

    #[test]
    fn result_builders() {
        let result = CheckResult::fail("missing").with_remediation("run apply-migration");
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.remediation.as_deref(), Some("run apply-migration"));
    }

    #[test]
    fn context_of_empty_root() {
        let temp = TempDir::new().unwrap();
        let ctx = ValidationContext::load(temp.path(), &Settings::default());

        assert!(!ctx.canonical_exists);
        assert!(!ctx.config_exists);
        assert!(ctx.store().is_none());
        assert!(ctx.registry.is_empty());
        assert!(ctx.legacy_dirs.is_empty());
        assert!(ctx.export_manifest.is_none());
    }
}
