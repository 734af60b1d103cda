//! Cleanup state machine.
//!
//! ```text
//! Idle -> Validating -> AwaitingConfirmation -> BackingUp -> BackedUp -> Deleting -> Done
//!            |                  |                   |
//!            +-> Idle (failed)  +-> Idle (declined) +-> Idle (backup failed)
//! ```
//!
//! Deletion only starts from `BackedUp`, which is only reached once the
//! backup manifest has been written and verified.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::backup::create_backup;
use crate::config::Settings;
use crate::scan::Scanner;
use crate::ui::{Prompt, UserInterface};
use crate::validate::{CheckId, CheckRegistry, CheckStatus, ValidationContext};

/// Checks that must not fail before anything is deleted.
const REQUIRED_CHECKS: &[&str] = &["canonical-dir", "component-count", "core-sections"];

/// Where the coordinator is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupState {
    Idle,
    Validating,
    AwaitingConfirmation,
    BackingUp,
    BackedUp,
    Deleting,
    Done,
}

impl fmt::Display for CleanupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CleanupState::Idle => "idle",
            CleanupState::Validating => "validating",
            CleanupState::AwaitingConfirmation => "awaiting confirmation",
            CleanupState::BackingUp => "backing up",
            CleanupState::BackedUp => "backed up",
            CleanupState::Deleting => "deleting",
            CleanupState::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// How a cleanup run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStatus {
    /// Every legacy directory was backed up and deleted.
    Completed,
    /// There were no legacy directories.
    NothingToClean,
    /// A precondition failed; nothing was touched.
    ValidationFailed,
    /// The user did not confirm; nothing was touched.
    Declined,
    /// The backup could not be written or verified; nothing was deleted.
    BackupFailed,
    /// The backup succeeded but some directories could not be deleted.
    PartialCleanup,
}

impl CleanupStatus {
    /// Process exit code for this status.
    pub fn exit_code(&self) -> i32 {
        match self {
            CleanupStatus::Completed | CleanupStatus::NothingToClean => 0,
            CleanupStatus::ValidationFailed | CleanupStatus::Declined => 1,
            CleanupStatus::BackupFailed => 2,
            CleanupStatus::PartialCleanup => 3,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

/// A directory that could not be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub directory: String,
    pub message: String,
}

/// Result of a cleanup run.
#[derive(Debug, Clone)]
pub struct CleanupOutcome {
    pub status: CleanupStatus,
    /// Failed preconditions, one line each.
    pub failed_checks: Vec<String>,
    /// Legacy directories found when the run started.
    pub candidates: Vec<String>,
    /// The verified backup, when one was taken.
    pub backup_dir: Option<PathBuf>,
    pub deleted: Vec<String>,
    pub failures: Vec<DeletionFailure>,
    /// Fatal error detail (backup failure).
    pub error: Option<String>,
    /// Every state the machine passed through, in order.
    pub transitions: Vec<CleanupState>,
}

impl CleanupOutcome {
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

/// Preconditions for deleting legacy directories, as itemized failures.
///
/// Empty means cleanup may proceed.
pub fn cleanup_preconditions(root: &Path, settings: &Settings) -> Vec<String> {
    let ctx = ValidationContext::load(root, settings);
    let report = CheckRegistry::with_builtins().run(&ctx);

    let mut failed: Vec<String> = report
        .failures()
        .filter(|o| REQUIRED_CHECKS.iter().any(|id| o.id == CheckId::new(*id)))
        .map(|o| format!("{}: {}", o.name, o.message))
        .collect();

    if !report.meets(settings.min_grade) {
        failed.push(format!(
            "Migration grade: {} (score {}) is below the minimum {}",
            report.grade, report.score, settings.min_grade
        ));
    }
    for outcome in report.outcomes.iter().filter(|o| o.status == CheckStatus::Fail) {
        tracing::debug!("Check {} failed: {}", outcome.id, outcome.message);
    }
    failed
}

/// Drives one cleanup run.
pub struct CleanupCoordinator<'a> {
    root: &'a Path,
    settings: &'a Settings,
    assume_yes: bool,
    state: CleanupState,
    transitions: Vec<CleanupState>,
}

impl<'a> CleanupCoordinator<'a> {
    pub fn new(root: &'a Path, settings: &'a Settings) -> Self {
        Self {
            root,
            settings,
            assume_yes: false,
            state: CleanupState::Idle,
            transitions: vec![CleanupState::Idle],
        }
    }

    /// Skip the confirmation prompt (`--yes`).
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn state(&self) -> CleanupState {
        self.state
    }

    fn transition(&mut self, next: CleanupState) {
        tracing::info!("Cleanup: {} -> {}", self.state, next);
        self.state = next;
        self.transitions.push(next);
    }

    fn finish(&mut self, status: CleanupStatus, candidates: Vec<String>) -> CleanupOutcome {
        CleanupOutcome {
            status,
            failed_checks: Vec::new(),
            candidates,
            backup_dir: None,
            deleted: Vec::new(),
            failures: Vec::new(),
            error: None,
            transitions: self.transitions.clone(),
        }
    }

    /// Run the state machine to completion.
    pub fn run(&mut self, ui: &mut dyn UserInterface) -> CleanupOutcome {
        self.transition(CleanupState::Validating);

        let candidates: Vec<String> = match Scanner::new(self.settings).template_dirs(self.root) {
            Ok(dirs) => dirs.into_iter().map(|(name, _)| name).collect(),
            Err(e) => {
                ui.error(&format!("Cannot read {}: {}", self.root.display(), e));
                self.transition(CleanupState::Idle);
                let mut outcome = self.finish(CleanupStatus::ValidationFailed, Vec::new());
                outcome.failed_checks.push(format!("Template root: {}", e));
                return outcome;
            }
        };

        let failed_checks = cleanup_preconditions(self.root, self.settings);
        if !failed_checks.is_empty() {
            for check in &failed_checks {
                ui.error(check);
            }
            self.transition(CleanupState::Idle);
            let mut outcome = self.finish(CleanupStatus::ValidationFailed, candidates);
            outcome.failed_checks = failed_checks;
            return outcome;
        }
        ui.success("Migration validated");

        if candidates.is_empty() {
            ui.message("No legacy template directories to clean up");
            self.transition(CleanupState::Idle);
            return self.finish(CleanupStatus::NothingToClean, candidates);
        }

        self.transition(CleanupState::AwaitingConfirmation);
        for dir in &candidates {
            ui.message(&format!("  {}", dir));
        }
        if !self.confirmed(ui, candidates.len()) {
            ui.warning("Cleanup cancelled, nothing was deleted");
            self.transition(CleanupState::Idle);
            return self.finish(CleanupStatus::Declined, candidates);
        }

        self.transition(CleanupState::BackingUp);
        let mut spinner = ui.start_spinner("Backing up legacy templates...");
        let backup = match create_backup(self.root, self.settings, &candidates) {
            Ok(backup) => {
                spinner.finish_success(&format!("Backup written to {}", backup.dir.display()));
                backup
            }
            Err(e) => {
                spinner.finish_error("Backup failed");
                ui.error(&format!("{}. Nothing was deleted.", e));
                self.transition(CleanupState::Idle);
                let mut outcome = self.finish(CleanupStatus::BackupFailed, candidates);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };
        self.transition(CleanupState::BackedUp);

        self.transition(CleanupState::Deleting);
        let mut spinner = ui.start_spinner("Removing legacy templates...");
        let mut deleted = Vec::new();
        let mut failures = Vec::new();
        // Only directories the verified manifest lists are eligible.
        for directory in &backup.manifest.directories {
            let path = self.root.join(directory);
            spinner.set_message(&format!("Removing {}...", directory));
            match fs::remove_dir_all(&path) {
                Ok(()) => {
                    tracing::info!("Deleted {}", path.display());
                    deleted.push(directory.clone());
                }
                Err(e) => {
                    tracing::warn!("Failed to delete {}: {}", path.display(), e);
                    failures.push(DeletionFailure {
                        directory: directory.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        if failures.is_empty() {
            spinner.finish_success(&format!("Removed {} director(ies)", deleted.len()));
        } else {
            spinner.finish_error(&format!("{} director(ies) could not be removed", failures.len()));
            for failure in &failures {
                ui.error(&format!("{}: {}", failure.directory, failure.message));
            }
        }
        self.transition(CleanupState::Done);

        let status = if failures.is_empty() {
            CleanupStatus::Completed
        } else {
            CleanupStatus::PartialCleanup
        };
        let mut outcome = self.finish(status, candidates);
        outcome.backup_dir = Some(backup.dir);
        outcome.deleted = deleted;
        outcome.failures = failures;
        outcome
    }

    fn confirmed(&self, ui: &mut dyn UserInterface, count: usize) -> bool {
        if self.assume_yes {
            return true;
        }
        let prompt = Prompt::confirm(
            "cleanup",
            format!(
                "Back up and delete {} legacy template director(ies)?",
                count
            ),
        );
        match ui.prompt(&prompt) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::backup::restore_backup;
    use crate::cleanup::manifest::BackupManifest;
    use crate::fsutil::list_files;
    use crate::migrate::{Migrator, Planner};
    use crate::ui::MockUI;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn settings() -> Settings {
        Settings {
            min_components: 1,
            core_sections: vec!["hero".to_string()],
            ..Settings::default()
        }
    }

    /// A root with two legacy templates, already migrated.
    fn migrated_root(settings: &Settings) -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("templates");
        write(&root, "home-electronic/Hero.jsx", "export default () => 'electronic';\n");
        write(&root, "home-fashion/Hero.jsx", "export default () => 'fashion';\n");
        write(&root, "home-fashion/parts/Badge.jsx", "export default () => 'badge';\n");

        let report = Scanner::new(settings).scan(&root);
        let plan = Planner::new(settings).plan(&report);
        Migrator::new(settings).apply(&plan).unwrap();
        temp
    }

    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        list_files(root)
            .unwrap()
            .into_iter()
            .map(|rel| {
                let bytes = fs::read(root.join(&rel)).unwrap();
                (rel, bytes)
            })
            .collect()
    }

    #[test]
    fn exit_codes() {
        assert_eq!(CleanupStatus::Completed.exit_code(), 0);
        assert_eq!(CleanupStatus::NothingToClean.exit_code(), 0);
        assert_eq!(CleanupStatus::ValidationFailed.exit_code(), 1);
        assert_eq!(CleanupStatus::Declined.exit_code(), 1);
        assert_eq!(CleanupStatus::BackupFailed.exit_code(), 2);
        assert_eq!(CleanupStatus::PartialCleanup.exit_code(), 3);
    }

    #[test]
    fn unmigrated_root_fails_validation_with_itemized_checks() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home-fashion/Hero.jsx", "");
        let settings = Settings::default();
        let mut ui = MockUI::new();

        let outcome = CleanupCoordinator::new(temp.path(), &settings)
            .assume_yes(true)
            .run(&mut ui);

        assert_eq!(outcome.status, CleanupStatus::ValidationFailed);
        assert!(outcome.failed_checks.iter().any(|c| c.starts_with("Canonical directory")));
        assert!(outcome.failed_checks.iter().any(|c| c.starts_with("Core sections")));
        assert!(temp.path().join("home-fashion/Hero.jsx").exists());
        assert_eq!(
            outcome.transitions,
            vec![CleanupState::Idle, CleanupState::Validating, CleanupState::Idle]
        );
    }

    #[test]
    fn unanswered_confirmation_declines() {
        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        let mut ui = MockUI::new();

        let outcome = CleanupCoordinator::new(&root, &settings).run(&mut ui);

        assert_eq!(outcome.status, CleanupStatus::Declined);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(ui.prompts_shown(), &["cleanup".to_string()]);
        assert!(root.join("home-fashion").exists());
        assert!(!root.join(".storeforge").exists());
    }

    #[test]
    fn confirmed_cleanup_backs_up_then_deletes() {
        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        let mut ui = MockUI::new();
        ui.set_prompt_response("cleanup", "yes");

        let outcome = CleanupCoordinator::new(&root, &settings).run(&mut ui);

        assert_eq!(outcome.status, CleanupStatus::Completed);
        assert_eq!(outcome.deleted, vec!["home-electronic", "home-fashion"]);
        assert!(!root.join("home-electronic").exists());
        assert!(!root.join("home-fashion").exists());
        assert!(root.join("shared/Hero.jsx").exists());

        let backup_dir = outcome.backup_dir.unwrap();
        let manifest = BackupManifest::load(&backup_dir).unwrap();
        assert_eq!(manifest.directories, outcome.deleted);
        assert_eq!(
            outcome.transitions,
            vec![
                CleanupState::Idle,
                CleanupState::Validating,
                CleanupState::AwaitingConfirmation,
                CleanupState::BackingUp,
                CleanupState::BackedUp,
                CleanupState::Deleting,
                CleanupState::Done,
            ]
        );
    }

    #[test]
    fn second_cleanup_has_nothing_to_do() {
        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");

        let mut ui = MockUI::new();
        let first = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);
        assert_eq!(first.status, CleanupStatus::Completed);

        let second = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);
        assert_eq!(second.status, CleanupStatus::NothingToClean);
        assert_eq!(second.exit_code(), 0);
    }

    #[test]
    fn backup_failure_deletes_nothing() {
        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        // A file where the backup directory should go.
        write(&root, ".storeforge/backups", "in the way");
        let before = snapshot(&root.join("home-fashion"));
        let mut ui = MockUI::new();

        let outcome = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);

        assert_eq!(outcome.status, CleanupStatus::BackupFailed);
        assert_eq!(outcome.exit_code(), 2);
        assert!(outcome.error.is_some());
        assert!(outcome.deleted.is_empty());
        assert!(!outcome.transitions.contains(&CleanupState::Deleting));
        assert_eq!(snapshot(&root.join("home-fashion")), before);
        assert!(root.join("home-electronic/Hero.jsx").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_in_legacy_directory_survives_cleanup_and_restore() {
        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        write(temp.path(), "brand/logo.svg", "<svg/>");
        std::os::unix::fs::symlink("../../brand/logo.svg", root.join("home-fashion/logo.svg")).unwrap();
        let mut ui = MockUI::new();

        let outcome = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);

        assert_eq!(outcome.status, CleanupStatus::Completed);
        assert!(fs::symlink_metadata(root.join("home-fashion/logo.svg")).is_err());
        let backup_dir = outcome.backup_dir.unwrap();
        let manifest = BackupManifest::load(&backup_dir).unwrap();
        assert_eq!(manifest.links.len(), 1);
        assert_eq!(manifest.links[0].path, "home-fashion/logo.svg");

        restore_backup(&backup_dir, None, false).unwrap();
        assert_eq!(
            fs::read_link(root.join("home-fashion/logo.svg")).unwrap(),
            PathBuf::from("../../brand/logo.svg")
        );
        assert_eq!(
            fs::read_to_string(root.join("home-fashion/logo.svg")).unwrap(),
            "<svg/>"
        );
    }

    #[cfg(unix)]
    #[test]
    fn special_file_in_legacy_directory_deletes_nothing() {
        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        let socket = root.join("home-fashion/dev.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket).unwrap();
        let mut ui = MockUI::new();

        let outcome = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);

        assert_eq!(outcome.status, CleanupStatus::BackupFailed);
        assert!(outcome.deleted.is_empty());
        assert!(outcome.error.unwrap().contains("dev.sock"));
        assert!(root.join("home-electronic/Hero.jsx").exists());
        assert!(fs::symlink_metadata(&socket).is_ok());
    }

    #[test]
    fn backup_dir_among_templates_is_never_a_candidate() {
        let settings = Settings {
            backup_dir: PathBuf::from("backups"),
            ..settings()
        };
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        let mut ui = MockUI::new();

        let first = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);
        assert_eq!(first.status, CleanupStatus::Completed);
        assert_eq!(first.deleted, vec!["home-electronic", "home-fashion"]);
        assert!(first.backup_dir.unwrap().starts_with(root.join("backups")));

        let second = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);
        assert_eq!(second.status, CleanupStatus::NothingToClean);
        assert!(root.join("backups").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn locked_directory_gives_partial_cleanup() {
        use std::os::unix::fs::PermissionsExt;

        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        let locked = root.join("home-fashion/parts");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind a privileged user.
        if fs::write(locked.join("writable"), "").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut ui = MockUI::new();
        let outcome = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(outcome.status, CleanupStatus::PartialCleanup);
        assert_eq!(outcome.exit_code(), 3);
        assert_eq!(outcome.deleted, vec!["home-electronic"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].directory, "home-fashion");
        assert!(ui.has_error("home-fashion"));
    }

    #[cfg(unix)]
    #[test]
    fn restore_script_reproduces_deleted_tree() {
        use std::process::Command;

        let settings = settings();
        let temp = migrated_root(&settings);
        let root = temp.path().join("templates");
        let before_fashion = snapshot(&root.join("home-fashion"));
        let before_electronic = snapshot(&root.join("home-electronic"));

        let mut ui = MockUI::new();
        let outcome = CleanupCoordinator::new(&root, &settings)
            .assume_yes(true)
            .run(&mut ui);
        assert_eq!(outcome.status, CleanupStatus::Completed);
        assert!(!root.join("home-fashion").exists());

        let backup_dir = outcome.backup_dir.unwrap();
        let status = Command::new("sh")
            .arg(backup_dir.join("restore.sh"))
            .status()
            .unwrap();
        assert!(status.success());

        assert_eq!(snapshot(&root.join("home-fashion")), before_fashion);
        assert_eq!(snapshot(&root.join("home-electronic")), before_electronic);
    }
}
