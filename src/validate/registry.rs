//! Check registry.
//!
//! The [`CheckRegistry`] holds the checks in report order and runs them
//! against a [`ValidationContext`].

use super::check::{Check, CheckId, ValidationContext};
use super::checks::{
    CanonicalDirCheck, ComponentCountCheck, ConfigArtifactCheck, CoreSectionsCheck,
    DefaultTemplateCheck, ExportManifestCheck, LegacyDirectoriesCheck, ManualMergeCheck,
    RegistryConsumersCheck, SectionsResolvableCheck, TemplatesConfiguredCheck,
};
use super::report::{CheckOutcome, ValidationReport};

/// Ordered collection of checks.
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Create a registry with all built-in checks.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CanonicalDirCheck));
        registry.register(Box::new(ExportManifestCheck));
        registry.register(Box::new(LegacyDirectoriesCheck));
        registry.register(Box::new(ConfigArtifactCheck));
        registry.register(Box::new(DefaultTemplateCheck));
        registry.register(Box::new(TemplatesConfiguredCheck));
        registry.register(Box::new(SectionsResolvableCheck));
        registry.register(Box::new(ComponentCountCheck));
        registry.register(Box::new(CoreSectionsCheck));
        registry.register(Box::new(ManualMergeCheck));
        registry.register(Box::new(RegistryConsumersCheck));
        registry
    }

    /// Register a check. A check with the same id is replaced in place.
    pub fn register(&mut self, check: Box<dyn Check>) {
        let id = check.id();
        match self.checks.iter().position(|c| c.id() == id) {
            Some(index) => self.checks[index] = check,
            None => self.checks.push(check),
        }
    }

    /// Get a check by ID.
    pub fn get(&self, id: &CheckId) -> Option<&dyn Check> {
        self.checks
            .iter()
            .find(|c| &c.id() == id)
            .map(|c| c.as_ref())
    }

    /// Iterate over all checks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check and grade the result.
    pub fn run(&self, ctx: &ValidationContext) -> ValidationReport {
        let outcomes = self
            .iter()
            .map(|check| {
                let result = check.run(ctx);
                tracing::debug!("Check {}: {}", check.id(), result.status);
                CheckOutcome {
                    id: check.id(),
                    name: check.name().to_string(),
                    category: check.category(),
                    weight: check.weight(),
                    status: result.status,
                    message: result.message,
                    remediation: result.remediation,
                }
            })
            .collect();
        ValidationReport::from_outcomes(outcomes)
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}
