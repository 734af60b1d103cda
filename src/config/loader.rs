//! Settings discovery and loading.
//!
//! Settings live next to the templates they govern, at
//! `<root>/.storeforge/config.yml`. A `--config` flag can point elsewhere.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::schema::Settings;
use crate::error::{Result, StoreforgeError};

/// Directory holding tool state under a template root.
pub const STATE_DIR: &str = ".storeforge";

/// Default settings path for a template root.
pub fn settings_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("config.yml")
}

/// Load settings for a template root.
///
/// An explicit path must exist. Without one, a missing
/// `.storeforge/config.yml` falls back to [`Settings::default`].
pub fn load_settings(root: &Path, explicit: Option<&Path>) -> Result<Settings> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(StoreforgeError::ConfigNotFound {
                    path: p.to_path_buf(),
                });
            }
            p.to_path_buf()
        }
        None => {
            let p = settings_path(root);
            if !p.exists() {
                tracing::debug!("No settings file at {}, using defaults", p.display());
                return Ok(Settings::default());
            }
            p
        }
    };

    let settings = load_settings_file(&path)?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Parse a single settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)?;
    parse_settings(&content, path)
}

/// Parse settings YAML. `path` is only used for error messages.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| StoreforgeError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reject settings that would make the scanner or cleanup misbehave.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    let mut components = Path::new(&settings.canonical_dir).components();
    let single_segment = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_segment {
        return Err(StoreforgeError::ConfigValidationError {
            message: format!(
                "canonical_dir must be a single directory name, got '{}'",
                settings.canonical_dir
            ),
        });
    }

    if settings.canonical_dir.starts_with('.') {
        return Err(StoreforgeError::ConfigValidationError {
            message: "canonical_dir must not be a hidden directory".to_string(),
        });
    }

    if settings.extensions.is_empty() {
        return Err(StoreforgeError::ConfigValidationError {
            message: "extensions must list at least one file extension".to_string(),
        });
    }

    if settings.backup_dir.is_absolute() {
        return Err(StoreforgeError::ConfigValidationError {
            message: "backup_dir must be relative to the template root".to_string(),
        });
    }

    let escapes = settings
        .backup_dir
        .components()
        .any(|c| matches!(c, Component::ParentDir));
    let hidden = settings
        .backup_root_name()
        .is_some_and(|name| name.starts_with('.'));
    if escapes || !hidden {
        return Err(StoreforgeError::ConfigValidationError {
            message: format!(
                "backup_dir must start with a hidden directory inside the template root, got '{}'",
                settings.backup_dir.display()
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(root: &Path, content: &str) {
        let dir = root.join(STATE_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), content).unwrap();
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(temp.path(), None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn loads_settings_from_state_dir() {
        let temp = TempDir::new().unwrap();
        write_settings(temp.path(), "canonical_dir: common\nmin_components: 1\n");

        let settings = load_settings(temp.path(), None).unwrap();
        assert_eq!(settings.canonical_dir, "common");
        assert_eq!(settings.min_components, 1);
    }

    #[test]
    fn explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        let err = load_settings(temp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, StoreforgeError::ConfigNotFound { .. }));
    }

    #[test]
    fn malformed_settings_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_settings(temp.path(), "min_components: [not, a, number]\n");

        let err = load_settings(temp.path(), None).unwrap_err();
        assert!(matches!(err, StoreforgeError::ConfigParseError { .. }));
    }

    #[test]
    fn empty_settings_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        write_settings(temp.path(), "   \n");
        assert_eq!(
            load_settings(temp.path(), None).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn rejects_nested_canonical_dir() {
        let settings = Settings {
            canonical_dir: "a/b".to_string(),
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_hidden_canonical_dir() {
        let settings = Settings {
            canonical_dir: ".shared".to_string(),
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_empty_extensions() {
        let settings = Settings {
            extensions: vec![],
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn backup_dir_must_not_look_like_a_template() {
        for dir in ["backups", "./backups", "", "../elsewhere", ".storeforge/../backups"] {
            let settings = Settings {
                backup_dir: PathBuf::from(dir),
                ..Default::default()
            };
            let err = validate_settings(&settings).unwrap_err();
            assert!(err.to_string().contains("hidden directory"), "{dir}: {err}");
        }

        for dir in [".backups", ".storeforge/backups"] {
            let settings = Settings {
                backup_dir: PathBuf::from(dir),
                ..Default::default()
            };
            assert!(validate_settings(&settings).is_ok(), "{dir}");
        }
    }

    #[test]
    fn settings_file_with_visible_backup_dir_is_rejected() {
        let temp = TempDir::new().unwrap();
        write_settings(temp.path(), "backup_dir: backups\n");

        let err = load_settings(temp.path(), None).unwrap_err();
        assert!(matches!(err, StoreforgeError::ConfigValidationError { .. }));
    }
}
