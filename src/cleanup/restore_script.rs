//! Standalone restore script written into every backup.
//!
//! The script needs nothing but the backup directory itself. Next to
//! `manifest.json` the backup carries two plain-text files the script reads
//! line by line: `source_root.txt` with the original root and
//! `directories.txt` with one directory name per line. It depends on POSIX
//! `sh`, `cat`, `mkdir` and `cp` only.

use anyhow::Context;
use std::fs;
use std::path::Path;

use super::manifest::BackupManifest;

/// Script file name inside a backup directory.
pub const RESTORE_SCRIPT: &str = "restore.sh";

/// Plain-text copy of the manifest's source root.
pub const SOURCE_ROOT_FILE: &str = "source_root.txt";

/// Plain-text copy of the manifest's directory list, one per line.
pub const DIRECTORIES_FILE: &str = "directories.txt";

const SCRIPT: &str = r#"#!/bin/sh
# Restore legacy template directories from this storeforge backup.
#
# Usage: sh restore.sh [TARGET_ROOT]
#
# Copies every directory listed in directories.txt back into TARGET_ROOT,
# which defaults to the root recorded in source_root.txt. Directories that
# already exist are skipped unless FORCE=1 is set.
set -eu

BACKUP_DIR=$(CDPATH= cd -- "$(dirname -- "$0")" && pwd)
DIRECTORIES="$BACKUP_DIR/directories.txt"
SOURCE_ROOT="$BACKUP_DIR/source_root.txt"

if [ ! -f "$BACKUP_DIR/manifest.json" ] || [ ! -f "$DIRECTORIES" ] || [ ! -f "$SOURCE_ROOT" ]; then
  echo "restore.sh: $BACKUP_DIR is not a storeforge backup" >&2
  exit 1
fi

if [ "$#" -ge 1 ]; then
  TARGET_ROOT=$1
else
  TARGET_ROOT=$(cat "$SOURCE_ROOT")
fi

if [ -z "$TARGET_ROOT" ]; then
  echo "restore.sh: no target root given and none recorded in the backup" >&2
  exit 1
fi

mkdir -p "$TARGET_ROOT"
restored=0
while IFS= read -r name || [ -n "$name" ]; do
  [ -n "$name" ] || continue
  src="$BACKUP_DIR/templates/$name"
  if [ ! -d "$src" ]; then
    echo "restore.sh: $name is listed but missing from templates/" >&2
    exit 1
  fi
  dest="$TARGET_ROOT/$name"
  if [ -e "$dest" ] && [ "${FORCE:-0}" != "1" ]; then
    echo "restore.sh: $dest exists, skipping (set FORCE=1 to overwrite)" >&2
    continue
  fi
  mkdir -p "$dest"
  cp -RPpf "$src/." "$dest/"
  restored=$((restored + 1))
  echo "restored $name"
done < "$DIRECTORIES"

echo "$restored director(ies) restored into $TARGET_ROOT"
"#;

/// The restore script.
pub fn render_restore_script() -> &'static str {
    SCRIPT
}

fn line(value: &str, what: &str) -> anyhow::Result<String> {
    if value.contains(['\n', '\r']) {
        anyhow::bail!("{} {:?} contains a line break", what, value);
    }
    Ok(format!("{}\n", value))
}

/// Write the restore script and the plain-text files it reads into
/// `backup_dir`. The script is executable on unix.
///
/// Fails when the source root or a directory name cannot be written as a
/// single line.
pub fn write_restore_script(backup_dir: &Path, manifest: &BackupManifest) -> anyhow::Result<()> {
    let source_root = manifest
        .source_root
        .to_str()
        .with_context(|| format!("{} is not valid UTF-8", manifest.source_root.display()))?;
    let directories = manifest
        .directories
        .iter()
        .map(|d| line(d, "directory name"))
        .collect::<anyhow::Result<String>>()?;

    for (name, content) in [
        (SOURCE_ROOT_FILE, line(source_root, "source root")?),
        (DIRECTORIES_FILE, directories),
    ] {
        let path = backup_dir.join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let path = backup_dir.join(RESTORE_SCRIPT);
    fs::write(&path, SCRIPT).with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make {} executable", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn script_is_self_contained() {
        let script = render_restore_script();
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("directories.txt"));
        assert!(!script.contains("sed "));
        assert!(!script.contains("grep "));
        // No paths from the run that generated it.
        assert!(!script.contains("/tmp"));
        insta::assert_snapshot!(script.lines().take(8).collect::<Vec<_>>().join("\n"), @r"
        #!/bin/sh
        # Restore legacy template directories from this storeforge backup.
        #
        # Usage: sh restore.sh [TARGET_ROOT]
        #
        # Copies every directory listed in directories.txt back into TARGET_ROOT,
        # which defaults to the root recorded in source_root.txt. Directories that
        # already exist are skipped unless FORCE=1 is set.
        ");
    }

    fn manifest(source_root: &str, directories: &[&str]) -> BackupManifest {
        BackupManifest::new(
            source_root,
            directories.iter().map(|d| d.to_string()).collect(),
            Vec::new(),
        )
    }

    #[test]
    fn writes_script() {
        let temp = TempDir::new().unwrap();
        let manifest = manifest("/site/shop \"main\"", &["home-electronic", "home-fashion"]);
        write_restore_script(temp.path(), &manifest).unwrap();
        let written = fs::read_to_string(temp.path().join(RESTORE_SCRIPT)).unwrap();
        assert_eq!(written, render_restore_script());
        assert_eq!(
            fs::read_to_string(temp.path().join(SOURCE_ROOT_FILE)).unwrap(),
            "/site/shop \"main\"\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join(DIRECTORIES_FILE)).unwrap(),
            "home-electronic\nhome-fashion\n"
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(temp.path().join(RESTORE_SCRIPT))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn line_breaks_in_names_are_refused() {
        let temp = TempDir::new().unwrap();
        let err = write_restore_script(temp.path(), &manifest("/site", &["home\nfashion"])).unwrap_err();
        assert!(err.to_string().contains("line break"));
        assert!(!temp.path().join(RESTORE_SCRIPT).exists());
    }
}
