//! Template tree scanning.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::fsutil::sorted_entries;

use super::record::{DuplicateRecord, SourceLocation};

/// Directory names never treated as templates or walked into.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// State of the scan root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootStatus {
    /// The root was listed.
    Present,
    /// The root does not exist; the scan is an empty no-op.
    Missing,
    /// The root exists but could not be listed.
    Unreadable,
}

/// A section implementation file inside a template directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionFile {
    /// Section kind, the file stem (`Hero`).
    pub kind: String,
    /// Full path of the file.
    pub path: PathBuf,
}

/// Everything found in one legacy template directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInventory {
    /// Directory name, used as the template identifier.
    pub name: String,
    /// Full path of the directory.
    pub path: PathBuf,
    /// Section files in discovery order.
    pub sections: Vec<SectionFile>,
}

/// Result of scanning a template root.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub root_status: RootStatus,
    /// Template directories in enumeration order.
    pub templates: Vec<TemplateInventory>,
    /// Section kind to every location it is implemented.
    pub record: DuplicateRecord,
    /// Non-fatal problems hit along the way.
    pub warnings: Vec<String>,
}

impl ScanReport {
    fn empty(root: &Path, root_status: RootStatus) -> Self {
        Self {
            root: root.to_path_buf(),
            root_status,
            templates: Vec::new(),
            record: DuplicateRecord::new(),
            warnings: Vec::new(),
        }
    }

    /// Total number of section files found.
    pub fn section_count(&self) -> usize {
        self.templates.iter().map(|t| t.sections.len()).sum()
    }

    /// Look up a template directory by name.
    pub fn template(&self, name: &str) -> Option<&TemplateInventory> {
        self.templates.iter().find(|t| t.name == name)
    }
}

/// Inventories legacy template directories.
///
/// Immediate subdirectories of the root are templates, except the canonical
/// directory, hidden directories (which covers `.storeforge`) and
/// `node_modules`. Subdirectories and files are visited in lexicographic
/// order, so the same tree always scans the same way.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    settings: &'a Settings,
}

impl<'a> Scanner<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Scan a template root.
    ///
    /// Never fails: a missing root yields an empty report, and a directory
    /// that cannot be read is reported as a warning while the others are
    /// still scanned.
    pub fn scan(&self, root: &Path) -> ScanReport {
        if !root.exists() {
            tracing::info!("Template root {} does not exist, nothing to scan", root.display());
            let mut report = ScanReport::empty(root, RootStatus::Missing);
            report
                .warnings
                .push(format!("Template root {} does not exist", root.display()));
            return report;
        }

        let dirs = match self.template_dirs(root) {
            Ok(dirs) => dirs,
            Err(e) => {
                tracing::warn!("Cannot list template root {}: {}", root.display(), e);
                let mut report = ScanReport::empty(root, RootStatus::Unreadable);
                report
                    .warnings
                    .push(format!("Cannot list {}: {}", root.display(), e));
                return report;
            }
        };

        let mut report = ScanReport::empty(root, RootStatus::Present);

        for (name, path) in dirs {
            match self.scan_template(&name, &path, &mut report.warnings) {
                Ok(inventory) => {
                    for section in &inventory.sections {
                        report.record.add(
                            &section.kind,
                            SourceLocation {
                                source_template: name.clone(),
                                file_path: section.path.clone(),
                            },
                        );
                    }
                    tracing::debug!(
                        "Template {}: {} section file(s)",
                        name,
                        inventory.sections.len()
                    );
                    report.templates.push(inventory);
                }
                Err(e) => {
                    tracing::warn!("Skipping template {}: {}", name, e);
                    report
                        .warnings
                        .push(format!("Cannot read template '{}': {}", name, e));
                }
            }
        }

        report
    }

    /// Legacy template directories under `root`, sorted by name.
    ///
    /// These are exactly the directories cleanup backs up and deletes.
    pub fn template_dirs(&self, root: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
        let mut dirs = Vec::new();
        for entry in sorted_entries(root)? {
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 directory name {}", entry.path().display());
                continue;
            };
            if self.is_template_dir(&name) {
                dirs.push((name, entry.path()));
            } else {
                tracing::debug!("Skipping directory {}", name);
            }
        }
        Ok(dirs)
    }

    fn is_template_dir(&self, name: &str) -> bool {
        name != self.settings.canonical_dir
            && Some(name) != self.settings.backup_root_name()
            && !name.starts_with('.')
            && !SKIPPED_DIRS.contains(&name)
    }

    fn scan_template(
        &self,
        name: &str,
        dir: &Path,
        warnings: &mut Vec<String>,
    ) -> std::io::Result<TemplateInventory> {
        let mut sections: Vec<SectionFile> = Vec::new();
        self.collect_sections(dir, &mut sections)?;

        // A kind counts once per template; keep the shallowest, first-sorted file.
        let mut unique: Vec<SectionFile> = Vec::with_capacity(sections.len());
        for section in sections {
            if let Some(kept) = unique.iter().find(|s| s.kind == section.kind) {
                warnings.push(format!(
                    "Template '{}' has more than one '{}' ({} ignored, using {})",
                    name,
                    section.kind,
                    section.path.display(),
                    kept.path.display()
                ));
                continue;
            }
            unique.push(section);
        }

        Ok(TemplateInventory {
            name: name.to_string(),
            path: dir.to_path_buf(),
            sections: unique,
        })
    }

    /// Files of a directory come before its subdirectories.
    fn collect_sections(&self, dir: &Path, sections: &mut Vec<SectionFile>) -> std::io::Result<()> {
        let mut subdirs = Vec::new();
        for entry in sorted_entries(dir)? {
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                let hidden = entry.file_name().to_str().is_none_or(|n| {
                    n.starts_with('.') || SKIPPED_DIRS.contains(&n)
                });
                if !hidden {
                    subdirs.push(path);
                }
                continue;
            }
            if !file_type.is_file() {
                continue;
            }
            if let Some(kind) = self.section_kind(&path) {
                // Stat up front so unreadable files fail this template only.
                fs::metadata(&path)?;
                sections.push(SectionFile { kind, path });
            }
        }
        for subdir in subdirs {
            self.collect_sections(&subdir, sections)?;
        }
        Ok(())
    }

    fn section_kind(&self, path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        let ext = path.extension()?.to_str()?;
        if !self.settings.is_section_extension(ext) || self.settings.is_ignored_stem(stem) {
            return None;
        }
        // Test and story files sit next to sections but are not sections.
        if stem.contains('.') {
            return None;
        }
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("// {}\n", rel)).unwrap();
    }

    #[test]
    fn finds_duplicate_hero() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home-fashion/Hero.jsx");
        write(temp.path(), "home-electronic/Hero.jsx");

        let settings = Settings::default();
        let report = Scanner::new(&settings).scan(temp.path());

        assert_eq!(report.root_status, RootStatus::Present);
        let dups: Vec<_> = report.record.duplicates().collect();
        assert_eq!(dups.len(), 1);
        let (kind, locations) = dups[0];
        assert_eq!(kind, "Hero");
        assert_eq!(locations[0].source_template, "home-electronic");
        assert_eq!(
            locations[0].file_path,
            temp.path().join("home-electronic/Hero.jsx")
        );
        assert_eq!(locations[1].source_template, "home-fashion");
    }

    #[test]
    fn excludes_canonical_and_hidden_directories() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "shared/Hero.jsx");
        write(temp.path(), ".storeforge/backups/x/Hero.jsx");
        write(temp.path(), "node_modules/pkg/Hero.js");
        write(temp.path(), "home-fashion/Hero.jsx");

        let settings = Settings::default();
        let report = Scanner::new(&settings).scan(temp.path());

        let names: Vec<_> = report.templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["home-fashion"]);
        assert_eq!(report.record.duplicate_count(), 0);
    }

    #[test]
    fn filters_by_extension_and_ignored_stems() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home/Hero.jsx");
        write(temp.path(), "home/Hero.css");
        write(temp.path(), "home/index.js");
        write(temp.path(), "home/Hero.test.jsx");
        write(temp.path(), "home/README.md");
        write(temp.path(), "home/sections/Footer.tsx");

        let settings = Settings::default();
        let report = Scanner::new(&settings).scan(temp.path());

        let kinds: Vec<_> = report.templates[0]
            .sections
            .iter()
            .map(|s| s.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["Hero", "Footer"]);
    }

    #[test]
    fn repeated_kind_in_one_template_counts_once() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home/Hero.jsx");
        write(temp.path(), "home/legacy/Hero.jsx");

        let settings = Settings::default();
        let report = Scanner::new(&settings).scan(temp.path());

        assert_eq!(report.section_count(), 1);
        assert_eq!(report.record.get("Hero").unwrap().len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn missing_root_is_empty_not_error() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default();
        let report = Scanner::new(&settings).scan(&temp.path().join("nope"));

        assert_eq!(report.root_status, RootStatus::Missing);
        assert!(report.templates.is_empty());
        assert!(report.record.is_empty());
    }

    #[test]
    fn root_that_is_a_file_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();

        let settings = Settings::default();
        let report = Scanner::new(&settings).scan(&file);
        assert_eq!(report.root_status, RootStatus::Unreadable);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_template_does_not_abort_scan() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        write(temp.path(), "a-ok/Hero.jsx");
        write(temp.path(), "b-locked/Hero.jsx");
        write(temp.path(), "c-ok/Hero.jsx");
        let locked = temp.path().join("b-locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permissions; nothing to assert in that environment.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let settings = Settings::default();
        let report = Scanner::new(&settings).scan(temp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<_> = report.templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a-ok", "c-ok"]);
        assert_eq!(report.record.get("Hero").unwrap().len(), 2);
        assert!(report.warnings.iter().any(|w| w.contains("b-locked")));
    }

    #[test]
    fn custom_canonical_dir_is_excluded() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "common/Hero.jsx");
        write(temp.path(), "shared/Hero.jsx");

        let settings = Settings {
            canonical_dir: "common".to_string(),
            ..Settings::default()
        };
        let report = Scanner::new(&settings).scan(temp.path());
        let names: Vec<_> = report.templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["shared"]);
    }

    #[test]
    fn backup_root_is_never_a_template() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home-fashion/Hero.jsx");
        write(temp.path(), "backups/20240101T000000Z/templates/home-fashion/Hero.jsx");

        let settings = Settings {
            backup_dir: PathBuf::from("backups"),
            ..Settings::default()
        };
        let scanner = Scanner::new(&settings);
        let dirs: Vec<String> = scanner
            .template_dirs(temp.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(dirs, vec!["home-fashion"]);
        let report = scanner.scan(temp.path());
        assert_eq!(report.templates.len(), 1);
    }
}
