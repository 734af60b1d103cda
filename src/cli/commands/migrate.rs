//! Apply-migration command implementation.
//!
//! The `storeforge apply-migration` command consolidates duplicated sections,
//! regenerates the template configuration and grades the result.

use std::path::{Path, PathBuf};

use crate::cli::args::ApplyArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::migrate::{Migrator, Planner};
use crate::scan::{RootStatus, Scanner};
use crate::ui::{should_use_colors, Summary, UserInterface};
use crate::validate::{CheckRegistry, HumanFormatter, ReportFormatter, ValidationContext, ValidationReport};

use super::dispatcher::{Command, CommandResult};
use super::prepare;
use super::scan::{relative, show_plan};

/// Run the built-in checks and print the human report.
pub(crate) fn grade(ui: &mut dyn UserInterface, root: &Path, settings: &Settings) -> ValidationReport {
    let ctx = ValidationContext::load(root, settings);
    let report = CheckRegistry::with_builtins().run(&ctx);

    let mut output = Vec::new();
    if HumanFormatter::new(should_use_colors())
        .format(&report, &mut output)
        .is_ok()
    {
        ui.message(String::from_utf8_lossy(&output).trim_end());
    }
    report
}

/// The apply-migration command implementation.
pub struct ApplyMigrationCommand {
    args: ApplyArgs,
    config: Option<PathBuf>,
}

impl ApplyMigrationCommand {
    pub fn new(args: ApplyArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }
}

impl Command for ApplyMigrationCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.args.root;
        let settings = prepare(root, self.config.as_deref(), ui)?;

        let title = if self.args.dry_run {
            format!("Migration plan for {} (dry run)", root.display())
        } else {
            format!("Migrating {}", root.display())
        };
        ui.show_header(&title);

        let report = Scanner::new(&settings).scan(root);
        match report.root_status {
            RootStatus::Unreadable => {
                for warning in &report.warnings {
                    ui.error(warning);
                }
                ui.show_summary(&Summary::new("Migration").count("migrated", 0).success(false));
                return Ok(CommandResult::failure(1));
            }
            RootStatus::Missing => {
                ui.warning(&format!("{} does not exist, nothing to migrate", root.display()));
                ui.show_summary(
                    &Summary::new("Migration")
                        .count("migrated", 0)
                        .note("Nothing to migrate"),
                );
                return Ok(CommandResult::success());
            }
            RootStatus::Present => {
                for warning in &report.warnings {
                    ui.warning(warning);
                }
            }
        }

        let plan = Planner::new(&settings).plan(&report);
        show_plan(ui, &plan);

        let migrator = Migrator::new(&settings).dry_run(self.args.dry_run);
        let result = match migrator.apply(&plan) {
            Ok(result) => result,
            Err(e) => {
                ui.error(&e.to_string());
                ui.show_summary(
                    &Summary::new("Migration")
                        .count("migrated", 0)
                        .count("errors", 1)
                        .success(false)
                        .note("Nothing was written"),
                );
                return Ok(CommandResult::failure(1));
            }
        };

        for kind in &result.migrated {
            ui.success(&format!("Unified {}", kind));
        }
        for kind in &result.skipped {
            ui.message(&format!("{} already unified, skipped", kind));
        }
        for error in &result.errors {
            ui.warning(&error.to_string());
        }
        let verb = if self.args.dry_run { "Would write" } else { "Wrote" };
        for file in &result.files_written {
            ui.message(&format!("{} {}", verb, relative(root, file)));
        }

        let summary = Summary::new("Migration")
            .count("migrated", result.migrated_count())
            .count("skipped", result.skipped_count())
            .count("errors", result.error_count())
            .count("files written", result.files_written.len());

        if self.args.dry_run {
            ui.show_summary(&summary.note("Dry run: nothing was written"));
            return Ok(CommandResult::success());
        }

        let graded = grade(ui, root, &settings);
        let passed = graded.meets(settings.min_grade);
        ui.show_summary(
            &summary
                .success(passed)
                .note(format!(
                    "Grade {} (score {}), minimum {}",
                    graded.grade, graded.score, settings.min_grade
                )),
        );

        Ok(if passed {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}
