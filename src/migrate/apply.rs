//! Applying migration plans.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{Result, StoreforgeError};
use crate::fsutil::write_if_changed;
use crate::store::TemplateStore;

use super::exports::{canonical_stems, is_generated_manifest, render_manifest};
use super::planner::MigrationPlan;
use super::shell::read_marker;

/// What happened to one consolidated kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindStatus {
    /// The unified shell was written.
    Migrated,
    /// A shell for this kind already exists.
    AlreadyMigrated,
}

/// Outcome of [`Migrator::apply`].
#[derive(Debug, Default)]
pub struct MigrationResult {
    /// Kinds whose unified shell was written (or would be, in a dry run).
    pub migrated: Vec<String>,
    /// Kinds already consolidated by an earlier run.
    pub skipped: Vec<String>,
    /// Per-kind planning failures; the other kinds went ahead.
    pub errors: Vec<StoreforgeError>,
    /// Every file written (or that would be written).
    pub files_written: Vec<PathBuf>,
}

impl MigrationResult {
    pub fn migrated_count(&self) -> usize {
        self.migrated.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Writes a [`MigrationPlan`] to disk.
#[derive(Debug, Clone, Copy)]
pub struct Migrator<'a> {
    settings: &'a Settings,
    dry_run: bool,
}

impl<'a> Migrator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            dry_run: false,
        }
    }

    /// Report what would be written without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Apply a plan.
    ///
    /// Writes unified shells, merges the regenerated templates into the
    /// configuration artifact, then regenerates the export manifest. Files
    /// are only written when their content changes, so applying the same plan
    /// twice writes nothing the second time.
    ///
    /// Fails outright only when the existing configuration artifact cannot be
    /// read, since merging into it would lose data.
    pub fn apply(&self, plan: &MigrationPlan) -> Result<MigrationResult> {
        let root = plan.root.as_path();
        let mut result = MigrationResult::default();
        result
            .errors
            .extend(plan.issues.iter().cloned().map(StoreforgeError::from));

        // Merge first so a broken artifact stops the run before any write.
        let config_path = self.settings.config_path(root);
        let mut store = TemplateStore::load_or_default(&config_path)?;
        for (id, entry) in &plan.templates {
            if let Some(previous) = store.insert(id, entry.clone())? {
                if &previous != entry {
                    tracing::info!("Replacing configuration of template '{}'", id);
                }
            }
        }
        let config_yaml = store.to_yaml()?;

        for consolidation in &plan.consolidations {
            match self.check_target(&consolidation.kind, &consolidation.target) {
                Ok(KindStatus::AlreadyMigrated) => {
                    tracing::info!("Section '{}' already migrated, skipping", consolidation.kind);
                    result.skipped.push(consolidation.kind.clone());
                }
                Ok(KindStatus::Migrated) => {
                    if !self.dry_run {
                        if let Err(e) = write_if_changed(&consolidation.target, &consolidation.shell) {
                            tracing::warn!("Cannot write {}: {}", consolidation.target.display(), e);
                            result.errors.push(StoreforgeError::PlanConflict {
                                kind: consolidation.kind.clone(),
                                message: format!("{:#}", e),
                            });
                            continue;
                        }
                    }
                    tracing::info!(
                        "Migrated section '{}' to {}",
                        consolidation.kind,
                        consolidation.target.display()
                    );
                    result.migrated.push(consolidation.kind.clone());
                    result.files_written.push(consolidation.target.clone());
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    result.errors.push(e);
                }
            }
        }

        if !plan.templates.is_empty() && self.write(&config_path, &config_yaml)? {
            result.files_written.push(config_path);
        }

        let manifest_path = self.settings.export_manifest_path(root);
        match self.manifest_content(root, &result.files_written)? {
            Some(manifest) => {
                if self.manifest_is_foreign(&manifest_path) {
                    result.errors.push(StoreforgeError::PlanConflict {
                        kind: self.settings.export_manifest.clone(),
                        message: format!(
                            "{} exists and was not generated by storeforge",
                            manifest_path.display()
                        ),
                    });
                } else if self.write(&manifest_path, &manifest)? {
                    result.files_written.push(manifest_path);
                }
            }
            None => tracing::debug!("No unified sections, export manifest not written"),
        }

        Ok(result)
    }

    /// Decide whether a kind's target may be written.
    fn check_target(&self, kind: &str, target: &Path) -> Result<KindStatus> {
        // A shell for the kind may already exist under another extension.
        let existing = self.settings.extensions.iter().find_map(|ext| {
            let candidate = target.with_extension(ext);
            candidate.is_file().then_some(candidate)
        });
        let Some(existing) = existing else {
            return Ok(KindStatus::Migrated);
        };

        let conflict = |message: String| StoreforgeError::PlanConflict {
            kind: kind.to_string(),
            message,
        };
        let content = fs::read_to_string(&existing)
            .map_err(|e| conflict(format!("cannot read existing {}: {}", existing.display(), e)))?;
        match read_marker(&content) {
            Some(marked) if marked == kind => Ok(KindStatus::AlreadyMigrated),
            Some(marked) => Err(conflict(format!(
                "{} holds section '{}'",
                existing.display(),
                marked
            ))),
            None => Err(conflict(format!(
                "{} already exists and was not generated by storeforge",
                existing.display()
            ))),
        }
    }

    fn manifest_content(&self, root: &Path, written: &[PathBuf]) -> Result<Option<String>> {
        let mut stems = canonical_stems(root, self.settings)?;
        if self.dry_run {
            // Shells are not on disk yet; count them as if they were.
            stems.extend(
                written
                    .iter()
                    .filter(|p| p.parent() == Some(self.settings.canonical_path(root).as_path()))
                    .filter_map(|p| p.file_stem().and_then(|s| s.to_str()))
                    .filter(|stem| !self.settings.is_ignored_stem(stem))
                    .map(str::to_string),
            );
            stems.sort();
            stems.dedup();
        }
        Ok((!stems.is_empty()).then(|| render_manifest(&stems)))
    }

    fn manifest_is_foreign(&self, path: &Path) -> bool {
        match fs::read_to_string(path) {
            Ok(content) => !is_generated_manifest(&content),
            Err(_) => false,
        }
    }

    /// Write if changed; in a dry run, report whether a write would happen.
    fn write(&self, path: &Path, content: &str) -> Result<bool> {
        if self.dry_run {
            let unchanged = fs::read_to_string(path).is_ok_and(|existing| existing == content);
            return Ok(!unchanged);
        }
        Ok(write_if_changed(path, content)?)
    }
}
