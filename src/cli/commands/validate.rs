//! Validate command implementation.
//!
//! The `storeforge validate` command runs the post-migration checks and
//! prints the graded report without changing anything.

use std::path::PathBuf;

use crate::cli::args::ValidateArgs;
use crate::error::Result;
use crate::ui::{Summary, UserInterface};
use crate::validate::{
    CheckRegistry, CheckStatus, JsonFormatter, ReportFormat, ReportFormatter, ValidationContext,
};

use super::dispatcher::{Command, CommandResult};
use super::migrate::grade;
use super::prepare;

/// The validate command implementation.
pub struct ValidateCommand {
    args: ValidateArgs,
    config: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn new(args: ValidateArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }
}

impl Command for ValidateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.args.root;
        let settings = prepare(root, self.config.as_deref(), ui)?;

        let report = match self.args.format {
            ReportFormat::Json => {
                let ctx = ValidationContext::load(root, &settings);
                let report = CheckRegistry::with_builtins().run(&ctx);
                let mut output = Vec::new();
                JsonFormatter::new().format(&report, &mut output)?;
                ui.message(&String::from_utf8_lossy(&output));
                report
            }
            ReportFormat::Human => {
                ui.show_header(&format!("Validating {}", root.display()));
                let report = grade(ui, root, &settings);
                ui.show_summary(
                    &Summary::new("Validation")
                        .count("passed", report.count(CheckStatus::Pass))
                        .count("warnings", report.count(CheckStatus::Warning))
                        .count("failed", report.count(CheckStatus::Fail))
                        .success(report.meets(settings.min_grade))
                        .note(format!(
                            "Grade {} (score {}), minimum {}",
                            report.grade, report.score, settings.min_grade
                        )),
                );
                report
            }
        };

        Ok(if report.meets(settings.min_grade) {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn command(root: &std::path::Path, format: ReportFormat) -> ValidateCommand {
        ValidateCommand::new(
            ValidateArgs {
                root: root.to_path_buf(),
                format,
            },
            None,
        )
    }

    #[test]
    fn empty_root_fails() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = command(temp.path(), ReportFormat::Human)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_message("grade F"));
        let summary = ui.last_summary().unwrap();
        assert!(!summary.success);
        assert!(summary.get("failed").unwrap() > 0);
    }

    #[test]
    fn json_report() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        command(temp.path(), ReportFormat::Json)
            .execute(&mut ui)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(parsed["grade"], "F");
        assert!(parsed["outcomes"].as_array().unwrap().len() > 5);
        assert!(ui.summaries().is_empty());
    }
}
