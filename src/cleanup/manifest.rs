//! Backup manifest.
//!
//! Every backup carries a `manifest.json` listing the copied directories, a
//! SHA-256 per file and the target of every symbolic link. The manifest is written and verified before any
//! legacy directory may be deleted.

use anyhow::Context;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreforgeError};
use crate::fsutil::sha256_file;

/// Manifest file name inside a backup directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory inside a backup holding the copied templates.
pub const TEMPLATES_DIR: &str = "templates";

/// Tool marker written into every manifest.
pub const TOOL_NAME: &str = "storeforge";

/// One copied file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupFile {
    /// Path relative to the backup's `templates/` directory, `/`-separated.
    pub path: String,
    pub size: u64,
    pub sha256: String,
}

/// One copied symbolic link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupLink {
    /// Path relative to the backup's `templates/` directory, `/`-separated.
    pub path: String,
    /// Link target as stored in the link, never resolved.
    pub target: PathBuf,
}

/// Description of one backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub tool: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    /// Absolute template root the directories were copied from.
    pub source_root: PathBuf,
    /// Legacy template directories in the backup, sorted.
    pub directories: Vec<String>,
    pub files: Vec<BackupFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<BackupLink>,
}

impl BackupManifest {
    /// Create a manifest stamped with the current time.
    pub fn new(source_root: impl Into<PathBuf>, directories: Vec<String>, files: Vec<BackupFile>) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now().trunc_subsecs(0),
            source_root: source_root.into(),
            directories,
            files,
            links: Vec::new(),
        }
    }

    /// Record the symbolic links copied with the files.
    pub fn with_links(mut self, links: Vec<BackupLink>) -> Self {
        self.links = links;
        self
    }

    /// Whether `backup_dir` contains a manifest file.
    pub fn exists(backup_dir: &Path) -> bool {
        backup_dir.join(MANIFEST_FILE).is_file()
    }

    /// Load the manifest of a backup directory.
    pub fn load(backup_dir: &Path) -> anyhow::Result<Self> {
        let path = backup_dir.join(MANIFEST_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if manifest.tool != TOOL_NAME {
            anyhow::bail!("{} was not written by {}", path.display(), TOOL_NAME);
        }
        Ok(manifest)
    }

    /// Write the manifest into `backup_dir` as pretty JSON.
    pub fn write(&self, backup_dir: &Path) -> anyhow::Result<()> {
        let path = backup_dir.join(MANIFEST_FILE);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Path of a directory's copy inside `backup_dir`.
    pub fn directory_path(backup_dir: &Path, directory: &str) -> PathBuf {
        backup_dir.join(TEMPLATES_DIR).join(directory)
    }

    /// Check that the manifest on disk matches `self` and every listed file
    /// is present with the recorded size and hash.
    pub fn verify(&self, backup_dir: &Path) -> Result<()> {
        let manifest_path = backup_dir.join(MANIFEST_FILE);
        let on_disk = Self::load(backup_dir).map_err(|e| StoreforgeError::BackupFailed {
            path: manifest_path.clone(),
            message: format!("{:#}", e),
        })?;
        if &on_disk != self {
            return Err(StoreforgeError::BackupFailed {
                path: manifest_path,
                message: "manifest on disk does not match the backup that was taken".to_string(),
            });
        }
        self.verify_files(backup_dir)
    }

    /// Check every listed directory, file and link against the copies in
    /// `backup_dir`.
    pub fn verify_files(&self, backup_dir: &Path) -> Result<()> {
        for directory in &self.directories {
            let path = Self::directory_path(backup_dir, directory);
            if !path.is_dir() {
                return Err(StoreforgeError::BackupFailed {
                    path,
                    message: "directory missing from backup".to_string(),
                });
            }
        }

        let templates = backup_dir.join(TEMPLATES_DIR);
        for file in &self.files {
            let path = templates.join(&file.path);
            let size = fs::metadata(&path)
                .map_err(|e| StoreforgeError::BackupFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
                .len();
            if size != file.size {
                return Err(StoreforgeError::BackupFailed {
                    path,
                    message: format!("expected {} bytes, found {}", file.size, size),
                });
            }
            let hash = sha256_file(&path).map_err(|e| StoreforgeError::BackupFailed {
                path: path.clone(),
                message: format!("{:#}", e),
            })?;
            if hash != file.sha256 {
                return Err(StoreforgeError::BackupFailed {
                    path,
                    message: "checksum mismatch".to_string(),
                });
            }
        }

        for link in &self.links {
            let path = templates.join(&link.path);
            let target = fs::read_link(&path).map_err(|e| StoreforgeError::BackupFailed {
                path: path.clone(),
                message: format!("symbolic link missing from backup: {}", e),
            })?;
            if target != link.target {
                return Err(StoreforgeError::BackupFailed {
                    path,
                    message: format!(
                        "link points to {}, expected {}",
                        target.display(),
                        link.target.display()
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backup_with_file(content: &str) -> (TempDir, BackupManifest) {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("templates/home-fashion");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Hero.jsx"), content).unwrap();

        let manifest = BackupManifest::new(
            "/site/templates",
            vec!["home-fashion".to_string()],
            vec![BackupFile {
                path: "home-fashion/Hero.jsx".to_string(),
                size: content.len() as u64,
                sha256: sha256_file(&dir.join("Hero.jsx")).unwrap(),
            }],
        );
        manifest.write(temp.path()).unwrap();
        (temp, manifest)
    }

    #[test]
    fn write_then_load() {
        let (temp, manifest) = backup_with_file("hero");
        let loaded = BackupManifest::load(temp.path()).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.tool, "storeforge");

        let json = fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap();
        assert!(json.contains("\"tool\": \"storeforge\""));
        assert!(json.contains("\"source_root\": \"/site/templates\","));
    }

    #[test]
    fn verify_passes_for_intact_backup() {
        let (temp, manifest) = backup_with_file("hero");
        assert!(manifest.verify(temp.path()).is_ok());
    }

    #[test]
    fn verify_detects_tampering() {
        let (temp, manifest) = backup_with_file("hero");
        fs::write(temp.path().join("templates/home-fashion/Hero.jsx"), "h3ro").unwrap();

        let err = manifest.verify(temp.path()).unwrap_err();
        assert!(matches!(err, StoreforgeError::BackupFailed { .. }));
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn verify_detects_missing_manifest() {
        let (temp, manifest) = backup_with_file("hero");
        fs::remove_file(temp.path().join(MANIFEST_FILE)).unwrap();
        assert!(manifest.verify(temp.path()).is_err());
    }

    #[test]
    fn manifest_without_links_omits_the_field() {
        let (temp, _) = backup_with_file("hero");
        let json = fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap();
        assert!(!json.contains("\"links\""));
    }

    #[cfg(unix)]
    #[test]
    fn verify_checks_link_targets() {
        let (temp, manifest) = backup_with_file("hero");
        let link = temp.path().join("templates/home-fashion/logo.svg");
        std::os::unix::fs::symlink("../assets/logo.svg", &link).unwrap();
        let manifest = manifest.with_links(vec![BackupLink {
            path: "home-fashion/logo.svg".to_string(),
            target: PathBuf::from("../assets/logo.svg"),
        }]);
        manifest.write(temp.path()).unwrap();
        assert!(manifest.verify(temp.path()).is_ok());

        fs::remove_file(&link).unwrap();
        std::os::unix::fs::symlink("../assets/other.svg", &link).unwrap();
        let err = manifest.verify(temp.path()).unwrap_err();
        assert!(err.to_string().contains("expected ../assets/logo.svg"));

        fs::remove_file(&link).unwrap();
        let err = manifest.verify(temp.path()).unwrap_err();
        assert!(err.to_string().contains("symbolic link missing"));
    }

    #[test]
    fn load_rejects_foreign_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{"tool":"other","version":"1","created_at":"2024-01-01T00:00:00Z","source_root":"/x","directories":[],"files":[]}"#,
        )
        .unwrap();
        assert!(BackupManifest::load(temp.path()).is_err());
    }
}
