//! Backup creation and restore.

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::manifest::{BackupFile, BackupLink, BackupManifest, TEMPLATES_DIR};
use super::restore_script::write_restore_script;
use crate::config::Settings;
use crate::error::{Result, StoreforgeError};
use crate::fsutil::{copy_tree, sha256_file};

/// A backup that was written and verified.
#[derive(Debug, Clone)]
pub struct Backup {
    /// Directory holding `templates/`, `manifest.json` and `restore.sh`.
    pub dir: PathBuf,
    pub manifest: BackupManifest,
}

fn backup_failed(path: impl Into<PathBuf>, message: impl ToString) -> StoreforgeError {
    StoreforgeError::BackupFailed {
        path: path.into(),
        message: message.to_string(),
    }
}

/// Join a relative path with `/` regardless of platform.
fn slash_path(directory: &str, rel: &Path) -> String {
    let mut parts = vec![directory.to_string()];
    parts.extend(rel.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    }));
    parts.join("/")
}

/// Create a fresh, uniquely named backup directory under `base`.
fn claim_backup_dir(base: &Path) -> Result<PathBuf> {
    fs::create_dir_all(base).map_err(|e| backup_failed(base, e))?;
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    for attempt in 0..100 {
        let name = if attempt == 0 {
            stamp.clone()
        } else {
            format!("{}-{}", stamp, attempt)
        };
        let dir = base.join(name);
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(backup_failed(&dir, e)),
        }
    }
    Err(backup_failed(base, "no free backup directory name"))
}

/// Copy legacy template directories under `root` into a new backup.
///
/// Symbolic links are copied as links and recorded with their targets.
/// Writes the manifest and the restore script, then verifies the whole
/// backup against the manifest. Any failure is a
/// [`StoreforgeError::BackupFailed`]; the source directories are never
/// touched.
pub fn create_backup(root: &Path, settings: &Settings, directories: &[String]) -> Result<Backup> {
    let source_root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let mut sorted: Vec<String> = directories.to_vec();
    sorted.sort();
    sorted.dedup();

    let base = settings.backup_path(root);
    if let Some(directory) = sorted.iter().find(|d| base.starts_with(root.join(d))) {
        return Err(backup_failed(
            &base,
            format!("backup location is inside the legacy directory '{}'", directory),
        ));
    }

    let dir = claim_backup_dir(&base)?;
    tracing::info!("Backing up {} director(ies) to {}", sorted.len(), dir.display());

    let templates = dir.join(TEMPLATES_DIR);
    let mut files = Vec::new();
    let mut links = Vec::new();
    for directory in &sorted {
        let src = root.join(directory);
        let dst = templates.join(directory);
        let copied = copy_tree(&src, &dst).map_err(|(path, e)| backup_failed(path, e))?;
        tracing::debug!(
            "Copied {} file(s) and {} link(s) from {}",
            copied.files.len(),
            copied.links.len(),
            src.display()
        );

        for rel in copied.files {
            let from = src.join(&rel);
            let size = fs::metadata(&from)
                .map_err(|e| backup_failed(&from, e))?
                .len();
            let sha256 = sha256_file(&from).map_err(|e| backup_failed(&from, format!("{:#}", e)))?;
            files.push(BackupFile {
                path: slash_path(directory, &rel),
                size,
                sha256,
            });
        }
        links.extend(copied.links.into_iter().map(|(rel, target)| BackupLink {
            path: slash_path(directory, &rel),
            target,
        }));
    }

    let manifest = BackupManifest::new(source_root, sorted, files).with_links(links);
    manifest
        .write(&dir)
        .map_err(|e| backup_failed(&dir, format!("{:#}", e)))?;
    write_restore_script(&dir, &manifest).map_err(|e| backup_failed(&dir, format!("{:#}", e)))?;
    manifest.verify(&dir)?;

    tracing::info!(
        "Backup verified: {} file(s), {} link(s)",
        manifest.files.len(),
        manifest.links.len()
    );
    Ok(Backup { dir, manifest })
}

/// What a restore did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub target: PathBuf,
    pub restored: Vec<String>,
}

/// Copy a backup's directories back into `target` (default: the recorded
/// source root).
///
/// The backup is verified first. Existing directories are refused unless
/// `force` is set, in which case files and links are copied over them.
pub fn restore_backup(backup_dir: &Path, target: Option<&Path>, force: bool) -> Result<RestoreOutcome> {
    let restore_failed = |message: String| StoreforgeError::RestoreFailed {
        path: backup_dir.to_path_buf(),
        message,
    };

    let manifest = BackupManifest::load(backup_dir).map_err(|e| restore_failed(format!("{:#}", e)))?;
    manifest
        .verify_files(backup_dir)
        .map_err(|e| restore_failed(e.to_string()))?;

    let target = target
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest.source_root.clone());

    let existing: Vec<&str> = manifest
        .directories
        .iter()
        .filter(|d| target.join(d).exists())
        .map(String::as_str)
        .collect();
    if !existing.is_empty() && !force {
        return Err(restore_failed(format!(
            "{} already exist(s) in {}; pass --force to overwrite",
            existing.join(", "),
            target.display()
        )));
    }

    let mut restored = Vec::new();
    for directory in &manifest.directories {
        let src = BackupManifest::directory_path(backup_dir, directory);
        copy_tree(&src, &target.join(directory)).map_err(|(path, e)| StoreforgeError::RestoreFailed {
            path,
            message: e.to_string(),
        })?;
        tracing::info!("Restored {}", directory);
        restored.push(directory.clone());
    }

    Ok(RestoreOutcome { target, restored })
}
