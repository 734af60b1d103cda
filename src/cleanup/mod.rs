//! Backup and cleanup of legacy template directories.
//!
//! - [`coordinator`] runs the validate, confirm, back up, delete sequence
//! - [`backup`] copies directories into a verified backup and restores them
//! - [`manifest`] describes a backup and verifies it
//! - [`restore_script`] is the standalone `restore.sh` written into each backup

pub mod backup;
pub mod coordinator;
pub mod manifest;
pub mod restore_script;

pub use backup::{create_backup, restore_backup, Backup, RestoreOutcome};
pub use coordinator::{
    cleanup_preconditions, CleanupCoordinator, CleanupOutcome, CleanupState, CleanupStatus,
    DeletionFailure,
};
pub use manifest::{BackupFile, BackupLink, BackupManifest, MANIFEST_FILE};
pub use restore_script::{render_restore_script, RESTORE_SCRIPT};
