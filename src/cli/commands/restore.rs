//! Restore command implementation.
//!
//! The `storeforge restore` command copies a backup's template directories
//! back, the same way the backup's `restore.sh` does.

use crate::cleanup::restore_backup;
use crate::cli::args::RestoreArgs;
use crate::error::Result;
use crate::ui::{Summary, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The restore command implementation.
pub struct RestoreCommand {
    args: RestoreArgs,
}

impl RestoreCommand {
    pub fn new(args: RestoreArgs) -> Self {
        Self { args }
    }
}

impl Command for RestoreCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header(&format!("Restoring from {}", self.args.backup.display()));

        match restore_backup(&self.args.backup, self.args.target.as_deref(), self.args.force) {
            Ok(outcome) => {
                for directory in &outcome.restored {
                    ui.success(&format!("Restored {}", directory));
                }
                ui.show_summary(
                    &Summary::new("Restore")
                        .count("restored", outcome.restored.len())
                        .note(format!("Into {}", outcome.target.display())),
                );
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&e.to_string());
                ui.show_summary(
                    &Summary::new("Restore")
                        .count("restored", 0)
                        .success(false),
                );
                Ok(CommandResult::failure(1))
            }
        }
    }
}
