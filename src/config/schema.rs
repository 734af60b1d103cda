//! Tool settings schema.
//!
//! These structs map to `.storeforge/config.yml`. Every field has a default,
//! so an empty file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::validate::Grade;

/// Root settings structure for `.storeforge/config.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reserved directory holding the unified section implementations.
    pub canonical_dir: String,

    /// File extensions recognised as section implementations.
    pub extensions: Vec<String>,

    /// File stems that never count as sections (barrel files and the like).
    pub ignored_stems: Vec<String>,

    /// Template configuration artifact, relative to the canonical directory.
    pub config_file: String,

    /// Consolidated export manifest, relative to the canonical directory.
    pub export_manifest: String,

    /// Where backups are written, relative to the template root. Must start
    /// with a hidden directory so the scanner never sees it as a template.
    pub backup_dir: PathBuf,

    /// Minimum number of unified sections before cleanup may run.
    pub min_components: usize,

    /// Section kinds that must exist in the canonical set before cleanup.
    pub core_sections: Vec<String>,

    /// Lowest report grade that still counts as a successful migration.
    pub min_grade: Grade,

    /// Extra directories (relative to the root) searched for registry consumers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumer_paths: Vec<PathBuf>,

    /// Default output mode: verbose, normal, quiet, silent
    pub default_output: OutputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canonical_dir: "shared".to_string(),
            extensions: vec![
                "jsx".to_string(),
                "tsx".to_string(),
                "js".to_string(),
                "ts".to_string(),
            ],
            ignored_stems: vec!["index".to_string()],
            config_file: "templates.yml".to_string(),
            export_manifest: "index.js".to_string(),
            backup_dir: PathBuf::from(".storeforge").join("backups"),
            min_components: 4,
            core_sections: vec![
                "hero".to_string(),
                "categories".to_string(),
                "products".to_string(),
                "footer".to_string(),
            ],
            min_grade: Grade::C,
            consumer_paths: Vec::new(),
            default_output: OutputMode::Normal,
        }
    }
}

impl Settings {
    /// Absolute path of the canonical directory under `root`.
    pub fn canonical_path(&self, root: &Path) -> PathBuf {
        root.join(&self.canonical_dir)
    }

    /// Absolute path of the template configuration artifact under `root`.
    pub fn config_path(&self, root: &Path) -> PathBuf {
        self.canonical_path(root).join(&self.config_file)
    }

    /// Absolute path of the export manifest under `root`.
    pub fn export_manifest_path(&self, root: &Path) -> PathBuf {
        self.canonical_path(root).join(&self.export_manifest)
    }

    /// Absolute path of the backup root under `root`.
    pub fn backup_path(&self, root: &Path) -> PathBuf {
        root.join(&self.backup_dir)
    }

    /// Top-level directory under the root that holds the backups.
    pub fn backup_root_name(&self) -> Option<&str> {
        self.backup_dir.components().find_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
    }

    /// Whether a file extension marks a section implementation.
    pub fn is_section_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Whether a file stem is excluded from section discovery.
    pub fn is_ignored_stem(&self, stem: &str) -> bool {
        self.ignored_stems.iter().any(|s| s.eq_ignore_ascii_case(stem))
    }
}

/// Output verbosity mode as written in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}
