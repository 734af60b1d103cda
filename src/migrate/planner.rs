//! Migration planning.
//!
//! Planning is pure: it reads the scan report (and stats the source files)
//! but never writes. The same report always yields the same plan.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::components::ComponentKey;
use crate::config::Settings;
use crate::error::StoreforgeError;
use crate::fsutil::to_kebab_case;
use crate::scan::{ScanReport, SourceLocation, TemplateInventory};
use crate::store::{SectionDescriptor, TemplateEntry};

use super::shell::render_shell;
use super::variant::guess_variant;

/// One duplicated section kind to consolidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Consolidation {
    /// Section kind as found on disk (`Hero`).
    pub kind: String,
    /// The source the unified shell is named after.
    pub canonical: SourceLocation,
    /// Every duplicate, canonical first.
    pub sources: Vec<SourceLocation>,
    /// Where the unified shell goes.
    pub target: PathBuf,
    /// Shell content.
    #[serde(skip)]
    pub shell: String,
}

/// A kind the planner refused to consolidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanIssue {
    pub kind: String,
    pub message: String,
}

impl From<PlanIssue> for StoreforgeError {
    fn from(issue: PlanIssue) -> Self {
        StoreforgeError::PlanConflict {
            kind: issue.kind,
            message: issue.message,
        }
    }
}

/// Everything `apply` needs to perform a migration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationPlan {
    pub root: PathBuf,
    /// Duplicated kinds, sorted by kind.
    pub consolidations: Vec<Consolidation>,
    /// Regenerated configuration, one entry per legacy template directory.
    pub templates: BTreeMap<String, TemplateEntry>,
    /// Kinds implemented by a single template; left where they are.
    pub unique_kinds: Vec<String>,
    /// Duplicated kinds that could not be planned.
    pub issues: Vec<PlanIssue>,
}

impl MigrationPlan {
    /// Whether the plan has nothing to consolidate and nothing to configure.
    pub fn is_empty(&self) -> bool {
        self.consolidations.is_empty() && self.templates.is_empty()
    }
}

/// Builds [`MigrationPlan`]s from scan reports.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    settings: &'a Settings,
}

impl<'a> Planner<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Plan a migration.
    ///
    /// The canonical source of each duplicated kind is its first location in
    /// the scan, which the scanner produces in lexicographic directory order.
    pub fn plan(&self, report: &ScanReport) -> MigrationPlan {
        let mut consolidations = Vec::new();
        let mut issues = Vec::new();
        // Two kinds may only differ in case (`Hero` vs `hero`); they would
        // share a registry key and, on most filesystems, a target file.
        let mut claimed: HashMap<String, String> = HashMap::new();

        for (kind, locations) in report.record.duplicates() {
            let key = ComponentKey::default_for(kind);
            if let Some(owner) = claimed.get(key.kind()) {
                tracing::warn!("Section '{}' collides with '{}'", kind, owner);
                issues.push(PlanIssue {
                    kind: kind.to_string(),
                    message: format!(
                        "its canonical name collides with section '{}' already planned",
                        owner
                    ),
                });
                continue;
            }

            let sources: Vec<SourceLocation> = locations
                .iter()
                .filter(|loc| loc.file_path.is_file())
                .cloned()
                .collect();
            let Some(canonical) = sources.first().cloned() else {
                tracing::warn!("Section '{}' has no readable source left", kind);
                issues.push(PlanIssue {
                    kind: kind.to_string(),
                    message: "none of its source files can be read".to_string(),
                });
                continue;
            };

            let ext = canonical
                .file_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("jsx");
            let target = self
                .settings
                .canonical_path(&report.root)
                .join(format!("{}.{}", kind, ext));
            let labels: Vec<String> = sources
                .iter()
                .map(|loc| source_label(&report.root, loc))
                .collect();

            tracing::debug!(
                "Section '{}': {} source(s), canonical {}",
                kind,
                sources.len(),
                labels[0]
            );
            claimed.insert(key.kind().to_string(), kind.to_string());
            consolidations.push(Consolidation {
                kind: kind.to_string(),
                shell: render_shell(kind, &labels),
                canonical,
                sources,
                target,
            });
        }

        let templates = report
            .templates
            .iter()
            .enumerate()
            .map(|(i, inventory)| {
                (
                    inventory.name.clone(),
                    regenerate_template(inventory, i as i64 + 1),
                )
            })
            .collect();

        MigrationPlan {
            root: report.root.clone(),
            consolidations,
            templates,
            unique_kinds: report
                .record
                .unique_kinds()
                .into_iter()
                .map(str::to_string)
                .collect(),
            issues,
        }
    }
}

/// Rebuild a template's configuration from the files in its directory.
///
/// Sections are numbered in discovery order from 1, all enabled, with the
/// variant guessed from the directory name.
pub fn regenerate_template(inventory: &TemplateInventory, order: i64) -> TemplateEntry {
    let variant = guess_variant(&inventory.name);
    inventory
        .sections
        .iter()
        .enumerate()
        .fold(
            TemplateEntry::new(display_name(&inventory.name), order),
            |entry, (i, section)| {
                let position = i as i64 + 1;
                let kind = to_kebab_case(&section.kind);
                entry.with_section(
                    SectionDescriptor::new(format!("{}-{}", kind, position), kind, position)
                        .with_variant(variant),
                )
            },
        )
}

/// `home-electronic` becomes `Home Electronic`.
pub fn display_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn source_label(root: &Path, loc: &SourceLocation) -> String {
    loc.file_path
        .strip_prefix(root)
        .unwrap_or(&loc.file_path)
        .display()
        .to_string()
}
