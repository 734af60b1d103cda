//! File tree checks.

use crate::migrate::exports::{canonical_stems, export_name, is_generated_manifest};
use crate::validate::{Category, Check, CheckId, CheckResult, ValidationContext};

/// The canonical directory exists.
pub struct CanonicalDirCheck;

impl Check for CanonicalDirCheck {
    fn id(&self) -> CheckId {
        CheckId::new("canonical-dir")
    }

    fn name(&self) -> &str {
        "Canonical directory"
    }

    fn category(&self) -> Category {
        Category::Structure
    }

    fn weight(&self) -> u32 {
        3
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let dir = ctx.settings.canonical_path(&ctx.root);
        if ctx.canonical_exists {
            CheckResult::pass(format!("{} exists", dir.display()))
        } else {
            CheckResult::fail(format!("{} does not exist", dir.display()))
                .with_remediation("Run `storeforge apply-migration` to create it")
        }
    }
}

/// The export manifest exists and lists every unified section.
pub struct ExportManifestCheck;

impl Check for ExportManifestCheck {
    fn id(&self) -> CheckId {
        CheckId::new("export-manifest")
    }

    fn name(&self) -> &str {
        "Export manifest"
    }

    fn category(&self) -> Category {
        Category::Structure
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let Some(content) = &ctx.export_manifest else {
            return CheckResult::fail(format!("{} is missing", ctx.settings.export_manifest))
                .with_remediation("Run `storeforge apply-migration` to generate it");
        };
        if !is_generated_manifest(content) {
            return CheckResult::warning(format!(
                "{} was not generated by storeforge",
                ctx.settings.export_manifest
            ))
            .with_remediation("Make sure it re-exports every unified section");
        }

        let stems = canonical_stems(&ctx.root, &ctx.settings).unwrap_or_default();
        let missing: Vec<String> = stems
            .iter()
            .filter(|stem| !content.contains(&format!("'./{}'", stem)))
            .map(|stem| export_name(stem))
            .collect();
        if missing.is_empty() {
            CheckResult::pass(format!("{} section(s) exported", stems.len()))
        } else {
            CheckResult::warning(format!("Not exported: {}", missing.join(", ")))
                .with_remediation("Re-run `storeforge apply-migration` to refresh the manifest")
        }
    }
}

/// No legacy template directories remain.
pub struct LegacyDirectoriesCheck;

impl Check for LegacyDirectoriesCheck {
    fn id(&self) -> CheckId {
        CheckId::new("legacy-directories")
    }

    fn name(&self) -> &str {
        "Legacy directories"
    }

    fn category(&self) -> Category {
        Category::Structure
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        match ctx.legacy_dirs.len() {
            0 => CheckResult::pass("No legacy template directories remain"),
            n => CheckResult::warning(format!("{} legacy template director(ies) remain", n))
                .with_remediation("Run `storeforge cleanup` once the migration is verified"),
        }
    }
}
