//! Component catalog checks.

use std::fs;

use crate::components::ComponentKey;
use crate::migrate::read_marker;
use crate::validate::{Category, Check, CheckId, CheckResult, ValidationContext};

/// Line every unmerged shell still carries.
const UNMERGED_NOTE: &str = "Merge their logic into this file by hand.";

/// Core section kinds missing from the canonical directory.
pub fn missing_core_sections(ctx: &ValidationContext) -> Vec<String> {
    ctx.settings
        .core_sections
        .iter()
        .filter(|kind| !ctx.registry.has_kind(kind))
        .map(|kind| ComponentKey::default_for(kind).kind().to_string())
        .collect()
}

/// The canonical directory holds enough unified sections.
pub struct ComponentCountCheck;

impl Check for ComponentCountCheck {
    fn id(&self) -> CheckId {
        CheckId::new("component-count")
    }

    fn name(&self) -> &str {
        "Component count"
    }

    fn category(&self) -> Category {
        Category::Components
    }

    fn weight(&self) -> u32 {
        3
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let found = ctx.registry.len();
        let min = ctx.settings.min_components;
        if found >= min {
            CheckResult::pass(format!("{} unified section(s) (minimum {})", found, min))
        } else {
            CheckResult::fail(format!(
                "{} unified section(s), at least {} required",
                found, min
            ))
            .with_remediation("Run `storeforge apply-migration` or add sections to the canonical directory")
        }
    }
}

/// Every core section kind has a unified implementation.
pub struct CoreSectionsCheck;

impl Check for CoreSectionsCheck {
    fn id(&self) -> CheckId {
        CheckId::new("core-sections")
    }

    fn name(&self) -> &str {
        "Core sections"
    }

    fn category(&self) -> Category {
        Category::Components
    }

    fn weight(&self) -> u32 {
        3
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let missing = missing_core_sections(ctx);
        if missing.is_empty() {
            CheckResult::pass(format!(
                "All core sections present ({})",
                ctx.settings.core_sections.join(", ")
            ))
        } else {
            CheckResult::fail(format!("Missing core sections: {}", missing.join(", ")))
                .with_remediation("Add the missing sections to the canonical directory")
        }
    }
}

/// Unified shells whose duplicated logic has been merged by hand.
pub struct ManualMergeCheck;

impl Check for ManualMergeCheck {
    fn id(&self) -> CheckId {
        CheckId::new("manual-merge")
    }

    fn name(&self) -> &str {
        "Manual merge"
    }

    fn category(&self) -> Category {
        Category::Components
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let mut pending = Vec::new();
        for key in ctx.registry.keys() {
            let Some(found) = ctx.registry.lookup(key.kind(), key.variant()) else {
                continue;
            };
            let Some(path) = found.renderer.source() else {
                continue;
            };
            let Ok(content) = fs::read_to_string(path) else {
                continue;
            };
            if read_marker(&content).is_some() && content.contains(UNMERGED_NOTE) {
                pending.push(found.renderer.name().to_string());
            }
        }

        if pending.is_empty() {
            CheckResult::pass("No generated placeholders left")
        } else {
            CheckResult::warning(format!(
                "{} unified section(s) still need a manual merge: {}",
                pending.len(),
                pending.join(", ")
            ))
            .with_remediation(
                "Merge the duplicated implementations into each shell, then delete the placeholder comment",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::migrate::render_shell;
    use crate::validate::CheckStatus;
    use tempfile::TempDir;

    fn shared_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        for (name, content) in files {
            fs::write(shared.join(name), content).unwrap();
        }
        temp
    }

    #[test]
    fn count_and_core_sections() {
        let temp = shared_with(&[
            ("Hero.jsx", ""),
            ("Categories.jsx", ""),
            ("Products.jsx", ""),
        ]);
        let ctx = ValidationContext::load(temp.path(), &Settings::default());

        assert_eq!(ComponentCountCheck.run(&ctx).status, CheckStatus::Fail);
        let core = CoreSectionsCheck.run(&ctx);
        assert_eq!(core.status, CheckStatus::Fail);
        assert!(core.message.contains("footer"));
        assert_eq!(missing_core_sections(&ctx), vec!["footer".to_string()]);
    }

    #[test]
    fn full_catalog_passes() {
        let temp = shared_with(&[
            ("Hero.jsx", ""),
            ("Categories.jsx", ""),
            ("Products.jsx", ""),
            ("Footer.jsx", ""),
        ]);
        let ctx = ValidationContext::load(temp.path(), &Settings::default());
        assert_eq!(ComponentCountCheck.run(&ctx).status, CheckStatus::Pass);
        assert_eq!(CoreSectionsCheck.run(&ctx).status, CheckStatus::Pass);
    }

    #[test]
    fn generated_shells_need_merge() {
        let shell = render_shell("Hero", &["a/Hero.jsx".to_string()]);
        let temp = shared_with(&[("Hero.jsx", &shell), ("Footer.jsx", "export default 1;")]);
        let ctx = ValidationContext::load(temp.path(), &Settings::default());

        let result = ManualMergeCheck.run(&ctx);
        assert_eq!(result.status, CheckStatus::Warning);
        assert!(result.message.contains("Hero"));
        assert!(!result.message.contains("Footer"));
    }
}
