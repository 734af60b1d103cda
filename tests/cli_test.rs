//! Integration tests for the storeforge binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("// {}\nexport default () => null;\n", rel)).unwrap();
}

/// Two legacy templates implementing the same four core sections.
fn storefront() -> TempDir {
    let temp = TempDir::new().unwrap();
    for dir in ["home-electronic", "home-fashion"] {
        for kind in ["Hero", "Categories", "Products", "Footer"] {
            write(temp.path(), &format!("{}/{}.jsx", dir, kind));
        }
    }
    temp
}

fn storeforge() -> Command {
    let mut cmd = Command::new(cargo_bin("storeforge"));
    cmd.env_remove("STOREFORGE_PROMPT_CLEANUP").env("NO_COLOR", "1");
    cmd
}

fn migrate(root: &Path) {
    storeforge()
        .args(["apply-migration"])
        .arg(root)
        .assert()
        .success();
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    storeforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan-and-plan"))
        .stdout(predicate::str::contains("apply-migration"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    storeforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn scan_lists_duplicated_sections() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    storeforge()
        .arg("scan-and-plan")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hero (2): home-electronic, home-fashion"))
        .stdout(predicate::str::contains("duplicated 4"));
    assert!(!temp.path().join("shared").exists());
    Ok(())
}

#[test]
fn scan_json_embeds_summary() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    let output = storeforge()
        .args(["scan-and-plan", "--json"])
        .arg(temp.path())
        .output()?;
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["summary"]["templates"], 2);
    assert_eq!(parsed["summary"]["duplicated"], 4);
    assert_eq!(parsed["summary"]["planned"], 4);
    Ok(())
}

#[test]
fn scan_missing_root_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    storeforge()
        .arg("scan-and-plan")
        .arg(temp.path().join("missing"))
        .assert()
        .success()
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn scan_file_root_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = temp.path().join("not-a-dir");
    fs::write(&file, "")?;
    storeforge()
        .arg("scan-and-plan")
        .arg(&file)
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn apply_migration_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());
    let config = fs::read(temp.path().join("shared/templates.yml"))?;
    let hero = fs::read(temp.path().join("shared/Hero.jsx"))?;

    storeforge()
        .arg("apply-migration")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("migrated 0"));

    assert_eq!(fs::read(temp.path().join("shared/templates.yml"))?, config);
    assert_eq!(fs::read(temp.path().join("shared/Hero.jsx"))?, hero);
    Ok(())
}

#[test]
fn apply_migration_dry_run_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    storeforge()
        .args(["apply-migration", "--dry-run"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: nothing was written"));
    assert!(!temp.path().join("shared").exists());
    Ok(())
}

#[test]
fn apply_migration_missing_root_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = temp.path().join("missing");
    storeforge()
        .arg("apply-migration")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("does not exist"))
        .stdout(predicate::str::contains("Nothing to migrate"));
    assert!(!root.exists());
    Ok(())
}

#[test]
fn cleanup_rejects_backup_dir_among_templates() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());
    fs::create_dir_all(temp.path().join(".storeforge"))?;
    fs::write(temp.path().join(".storeforge/config.yml"), "backup_dir: backups\n")?;

    storeforge()
        .args(["cleanup", "--yes"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("backup_dir"));

    assert!(temp.path().join("home-fashion/Hero.jsx").exists());
    assert!(!temp.path().join("backups").exists());
    Ok(())
}

#[test]
fn cleanup_without_confirmation_deletes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());

    storeforge()
        .arg("cleanup")
        .arg(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("pass --yes"));

    assert!(temp.path().join("home-fashion/Hero.jsx").exists());
    assert!(!temp.path().join(".storeforge/backups").exists());
    Ok(())
}

#[test]
fn cleanup_before_migration_fails_validation() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    storeforge()
        .args(["cleanup", "--yes"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("check(s) failed"));
    assert!(temp.path().join("home-fashion").exists());
    Ok(())
}

#[test]
fn cleanup_backs_up_then_deletes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());

    storeforge()
        .args(["cleanup", "--yes"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted 2"))
        .stdout(predicate::str::contains("restore.sh"));

    assert!(!temp.path().join("home-electronic").exists());
    assert!(!temp.path().join("home-fashion").exists());
    assert!(temp.path().join("shared/Hero.jsx").exists());

    let backups: Vec<_> = fs::read_dir(temp.path().join(".storeforge/backups"))?
        .collect::<Result<_, _>>()?;
    assert_eq!(backups.len(), 1);
    let backup = backups[0].path();
    assert!(backup.join("manifest.json").is_file());
    assert!(backup.join("restore.sh").is_file());
    assert!(backup.join("templates/home-fashion/Hero.jsx").is_file());

    // Restoring brings the legacy tree back byte for byte.
    storeforge()
        .arg("restore")
        .arg(&backup)
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(temp.path().join("home-fashion/Hero.jsx"))?,
        "// home-fashion/Hero.jsx\nexport default () => null;\n"
    );
    Ok(())
}

#[test]
fn cleanup_backup_failure_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());
    write(temp.path(), ".storeforge/backups");

    storeforge()
        .args(["cleanup", "--yes"])
        .arg(temp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("no directory was deleted"));

    assert!(temp.path().join("home-electronic/Hero.jsx").exists());
    assert!(temp.path().join("home-fashion/Hero.jsx").exists());
    Ok(())
}

#[test]
fn validate_json_report() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());

    let output = storeforge()
        .args(["validate", "--format", "json"])
        .arg(temp.path())
        .output()?;
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(parsed["score"].as_u64().unwrap() >= 70);
    let outcomes = parsed["outcomes"].as_array().unwrap();
    assert_eq!(parsed["summary"]["total"], outcomes.len());
    Ok(())
}

#[test]
fn validate_unmigrated_tree_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    storeforge()
        .arg("validate")
        .arg(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("grade F"));
    Ok(())
}

#[test]
fn resolve_after_migration() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());

    let output = storeforge()
        .args(["resolve", "--json"])
        .arg(temp.path())
        .arg("home-fashion")
        .output()?;
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["used_default"], false);
    assert_eq!(parsed["sections"].as_array().unwrap().len(), 4);
    assert!(parsed["warnings"].as_array().unwrap().is_empty());
    Ok(())
}

#[test]
fn resolve_unknown_template_uses_default() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());

    storeforge()
        .arg("resolve")
        .arg(temp.path())
        .arg("home-nothing")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown template 'home-nothing'"));
    Ok(())
}

#[test]
fn list_shows_templates_and_sections() -> Result<(), Box<dyn std::error::Error>> {
    let temp = storefront();
    migrate(temp.path());

    storeforge()
        .arg("list")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("home-fashion"))
        .stdout(predicate::str::contains("hero/default"));
    Ok(())
}

#[test]
fn schema_is_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = storeforge().arg("schema").output()?;
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(parsed["properties"]["templates"].is_object());
    Ok(())
}

#[test]
fn completions_generate() -> Result<(), Box<dyn std::error::Error>> {
    storeforge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("storeforge"));
    Ok(())
}
