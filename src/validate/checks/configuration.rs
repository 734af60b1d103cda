//! Configuration artifact checks.

use crate::compose::Resolver;
use crate::store::DEFAULT_TEMPLATE_ID;
use crate::validate::{Category, Check, CheckId, CheckResult, ValidationContext};

fn not_loaded(ctx: &ValidationContext) -> CheckResult {
    CheckResult::fail("Template configuration is not available")
        .with_remediation(format!("Fix {} first", ctx.settings.config_file))
}

/// The configuration artifact exists and parses.
pub struct ConfigArtifactCheck;

impl Check for ConfigArtifactCheck {
    fn id(&self) -> CheckId {
        CheckId::new("config-artifact")
    }

    fn name(&self) -> &str {
        "Configuration artifact"
    }

    fn category(&self) -> Category {
        Category::Configuration
    }

    fn weight(&self) -> u32 {
        3
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        if !ctx.config_exists {
            return CheckResult::fail(format!("{} is missing", ctx.settings.config_file))
                .with_remediation("Run `storeforge apply-migration` to generate it");
        }
        match &ctx.store {
            Ok(store) => CheckResult::pass(format!("{} template(s) configured", store.len())),
            Err(e) => CheckResult::fail(e.clone())
                .with_remediation("Correct the file by hand or delete it and re-run apply-migration"),
        }
    }
}

/// A `default` template is configured explicitly.
pub struct DefaultTemplateCheck;

impl Check for DefaultTemplateCheck {
    fn id(&self) -> CheckId {
        CheckId::new("default-template")
    }

    fn name(&self) -> &str {
        "Default template"
    }

    fn category(&self) -> Category {
        Category::Configuration
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let Some(store) = ctx.store() else {
            return not_loaded(ctx);
        };
        if store.contains(DEFAULT_TEMPLATE_ID) {
            CheckResult::pass("A 'default' template is configured")
        } else {
            CheckResult::warning("Unknown template ids fall back to the built-in default layout")
                .with_remediation(format!(
                    "Add a '{}' entry to {} to control the fallback page",
                    DEFAULT_TEMPLATE_ID, ctx.settings.config_file
                ))
        }
    }
}

/// Every legacy template directory has a configuration entry.
pub struct TemplatesConfiguredCheck;

impl Check for TemplatesConfiguredCheck {
    fn id(&self) -> CheckId {
        CheckId::new("templates-configured")
    }

    fn name(&self) -> &str {
        "Templates configured"
    }

    fn category(&self) -> Category {
        Category::Configuration
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let Some(store) = ctx.store() else {
            return not_loaded(ctx);
        };
        let missing: Vec<&str> = ctx
            .legacy_dirs
            .iter()
            .filter(|dir| !store.contains(dir))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            CheckResult::pass(format!("{} template(s) listed", store.len()))
        } else {
            CheckResult::fail(format!("No configuration for: {}", missing.join(", ")))
                .with_remediation("Re-run `storeforge apply-migration`")
        }
    }
}

/// Every enabled section resolves to a component.
pub struct SectionsResolvableCheck;

impl Check for SectionsResolvableCheck {
    fn id(&self) -> CheckId {
        CheckId::new("sections-resolvable")
    }

    fn name(&self) -> &str {
        "Sections resolvable"
    }

    fn category(&self) -> Category {
        Category::Configuration
    }

    fn weight(&self) -> u32 {
        2
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let Some(store) = ctx.store() else {
            return not_loaded(ctx);
        };
        let resolver = Resolver::new(store, &ctx.registry);

        let mut ids: Vec<&str> = store.list();
        if !store.contains(DEFAULT_TEMPLATE_ID) {
            ids.push(DEFAULT_TEMPLATE_ID);
        }

        let mut resolved = 0;
        let mut unresolved = Vec::new();
        for id in ids {
            let resolution = resolver.resolve_detailed(id);
            resolved += resolution.sections.len();
            unresolved.extend(
                resolution
                    .warnings
                    .into_iter()
                    .map(|w| format!("{}: {}", id, w)),
            );
        }

        if unresolved.is_empty() {
            CheckResult::pass(format!("{} section(s) resolve", resolved))
        } else {
            CheckResult::warning(format!(
                "{} section(s) have no component: {}",
                unresolved.len(),
                unresolved.join("; ")
            ))
            .with_remediation(
                "Move the missing sections into the canonical directory or disable them",
            )
        }
    }
}
