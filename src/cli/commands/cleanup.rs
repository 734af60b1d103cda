//! Cleanup command implementation.
//!
//! The `storeforge cleanup` command backs up and deletes the legacy template
//! directories once the migration validates. Exit codes: 0 done (or nothing
//! to do), 1 validation failed or not confirmed, 2 backup failed, 3 some
//! directories could not be deleted.

use std::path::PathBuf;

use crate::cleanup::{CleanupCoordinator, CleanupStatus, RESTORE_SCRIPT};
use crate::cli::args::CleanupArgs;
use crate::error::Result;
use crate::ui::{Summary, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::prepare;

/// The cleanup command implementation.
pub struct CleanupCommand {
    args: CleanupArgs,
    config: Option<PathBuf>,
}

impl CleanupCommand {
    pub fn new(args: CleanupArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }
}

impl Command for CleanupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.args.root;
        let settings = prepare(root, self.config.as_deref(), ui)?;
        ui.show_header(&format!("Cleaning up {}", root.display()));

        let outcome = CleanupCoordinator::new(root, &settings)
            .assume_yes(self.args.yes)
            .run(ui);

        let mut summary = Summary::new("Cleanup")
            .count("deleted", outcome.deleted.len())
            .count("failed", outcome.failures.len())
            .success(outcome.status.is_success());

        summary = match outcome.status {
            CleanupStatus::Completed => summary,
            CleanupStatus::NothingToClean => summary.note("No legacy template directories found"),
            CleanupStatus::ValidationFailed => summary.note(format!(
                "{} check(s) failed; run `storeforge validate {}` for the full report",
                outcome.failed_checks.len(),
                root.display()
            )),
            CleanupStatus::Declined => summary.note("Not confirmed; pass --yes to skip the prompt"),
            CleanupStatus::BackupFailed => {
                summary.note("Backup failed; no directory was deleted")
            }
            CleanupStatus::PartialCleanup => summary.note("Partial cleanup; see the errors above"),
        };
        if let Some(backup) = &outcome.backup_dir {
            summary = summary
                .note(format!("Backup: {}", backup.display()))
                .note(format!(
                    "Restore with `sh {}` or `storeforge restore {}`",
                    backup.join(RESTORE_SCRIPT).display(),
                    backup.display()
                ));
        }
        ui.show_summary(&summary);

        Ok(CommandResult::from_exit_code(outcome.exit_code()))
    }
}
