//! Scan-and-plan command implementation.
//!
//! The `storeforge scan-and-plan` command inventories the legacy template
//! directories, lists duplicated sections and previews the migration plan.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::args::ScanArgs;
use crate::error::Result;
use crate::migrate::{MigrationPlan, Planner};
use crate::scan::{RootStatus, ScanReport, Scanner};
use crate::ui::{Summary, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::prepare;

/// Show a file relative to the template root when possible.
pub(crate) fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Print the inventory and the duplicate list of a scan.
pub(crate) fn show_scan(ui: &mut dyn UserInterface, report: &ScanReport) {
    if report.templates.is_empty() {
        ui.message("No template directories found");
        return;
    }

    let mut table = Table::new(&["Template", "Sections"]).align_right(1);
    for template in &report.templates {
        table.add_row(&[template.name.clone(), template.sections.len().to_string()]);
    }
    ui.message(&table.render());

    if ui.output_mode().shows_detail() {
        for template in &report.templates {
            let kinds: Vec<&str> = template.sections.iter().map(|s| s.kind.as_str()).collect();
            ui.message(&format!("  {}: {}", template.name, kinds.join(", ")));
        }
    }

    let duplicates: Vec<_> = report.record.duplicates().collect();
    if duplicates.is_empty() {
        ui.message("No duplicated sections");
        return;
    }
    ui.message("Duplicated sections:");
    for (kind, locations) in duplicates {
        let templates: Vec<&str> = locations
            .iter()
            .map(|l| l.source_template.as_str())
            .collect();
        ui.message(&format!(
            "  {} ({}): {}",
            kind,
            locations.len(),
            templates.join(", ")
        ));
    }
}

/// Print what a migration plan would do.
pub(crate) fn show_plan(ui: &mut dyn UserInterface, plan: &MigrationPlan) {
    if plan.consolidations.is_empty() {
        ui.message("Nothing to consolidate");
    } else {
        ui.message("Planned consolidations:");
        for consolidation in &plan.consolidations {
            ui.message(&format!(
                "  {} -> {} (canonical: {})",
                consolidation.kind,
                relative(&plan.root, &consolidation.target),
                consolidation.canonical.source_template
            ));
        }
    }
    if !plan.templates.is_empty() {
        ui.message(&format!(
            "Template entries to regenerate: {}",
            plan.templates.keys().cloned().collect::<Vec<_>>().join(", ")
        ));
    }
    if ui.output_mode().shows_detail() && !plan.unique_kinds.is_empty() {
        ui.message(&format!(
            "Left in place (single template): {}",
            plan.unique_kinds.join(", ")
        ));
    }
    for issue in &plan.issues {
        ui.warning(&format!("{}: {}", issue.kind, issue.message));
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    scan: &'a ScanReport,
    plan: &'a MigrationPlan,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    templates: usize,
    sections: usize,
    duplicated: usize,
    planned: usize,
    conflicts: usize,
}

/// The scan-and-plan command implementation.
pub struct ScanCommand {
    args: ScanArgs,
    config: Option<PathBuf>,
}

impl ScanCommand {
    pub fn new(args: ScanArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.args.root;
        let settings = prepare(root, self.config.as_deref(), ui)?;

        let report = Scanner::new(&settings).scan(root);
        let plan = Planner::new(&settings).plan(&report);
        let unreadable = report.root_status == RootStatus::Unreadable;

        if self.args.json {
            let output = JsonOutput {
                scan: &report,
                plan: &plan,
                summary: JsonSummary {
                    templates: report.templates.len(),
                    sections: report.section_count(),
                    duplicated: report.record.duplicate_count(),
                    planned: plan.consolidations.len(),
                    conflicts: plan.issues.len(),
                },
            };
            let json = serde_json::to_string_pretty(&output).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(if unreadable {
                CommandResult::failure(1)
            } else {
                CommandResult::success()
            });
        }

        ui.show_header(&format!("Scanning {}", root.display()));

        match report.root_status {
            RootStatus::Unreadable => {
                for warning in &report.warnings {
                    ui.error(warning);
                }
                ui.show_summary(&Summary::new("Scan").count("templates", 0).success(false));
                return Ok(CommandResult::failure(1));
            }
            RootStatus::Missing => {
                ui.warning(&format!("{} does not exist, nothing to scan", root.display()));
            }
            RootStatus::Present => {
                for warning in &report.warnings {
                    ui.warning(warning);
                }
            }
        }

        show_scan(ui, &report);
        show_plan(ui, &plan);

        let mut summary = Summary::new("Scan")
            .count("templates", report.templates.len())
            .count("sections", report.section_count())
            .count("duplicated", report.record.duplicate_count())
            .count("planned", plan.consolidations.len())
            .count("conflicts", plan.issues.len());
        if !plan.consolidations.is_empty() {
            summary = summary.note(format!(
                "Run `storeforge apply-migration {}` to apply the plan",
                root.display()
            ));
        }
        ui.show_summary(&summary);

        Ok(CommandResult::success())
    }
}
