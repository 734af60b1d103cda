//! Composition resolution.
//!
//! Turns a template identifier into the ordered list of sections a page
//! renders: enabled sections only, stable-sorted by `order`, each paired with
//! its renderer. Sections whose component is missing are dropped with a
//! warning so the page still renders partially.

use std::sync::Arc;

use crate::components::{ComponentKey, ComponentRegistry, Renderer};
use crate::store::{Properties, TemplateStore};

/// A section ready for the rendering layer.
#[derive(Debug, Clone)]
pub struct ResolvedSection {
    /// Section id from configuration.
    pub id: String,

    /// The variant the configuration asked for.
    pub variant: String,

    /// The registry key that answered (the default variant on fallback).
    pub component: ComponentKey,

    /// The renderer to hand the properties to.
    pub renderer: Arc<dyn Renderer>,

    /// The section's properties, verbatim.
    pub properties: Properties,
}

impl PartialEq for ResolvedSection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.variant == other.variant
            && self.component == other.component
            && Arc::ptr_eq(&self.renderer, &other.renderer)
            && self.properties == other.properties
    }
}

/// Full outcome of resolving one template.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The identifier that was asked for.
    pub template_id: String,

    /// Display name of the entry that answered (the default on fallback).
    pub template_name: String,

    /// Whether the identifier was unknown and the default template was used.
    pub used_default: bool,

    /// Sections in render order.
    pub sections: Vec<ResolvedSection>,

    /// Sections dropped because no renderer matched.
    pub warnings: Vec<String>,
}

/// Resolves templates against a store and a component registry.
///
/// Holds only shared references and never mutates either, so one resolver
/// can serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a TemplateStore,
    registry: &'a ComponentRegistry,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a configuration snapshot.
    pub fn new(store: &'a TemplateStore, registry: &'a ComponentRegistry) -> Self {
        Self { store, registry }
    }

    /// Resolve a template into the sections to render.
    pub fn resolve(&self, template_id: &str) -> Vec<ResolvedSection> {
        self.resolve_detailed(template_id).sections
    }

    /// Resolve a template and report what was dropped along the way.
    pub fn resolve_detailed(&self, template_id: &str) -> Resolution {
        let used_default = !self.store.contains(template_id);
        let entry = self.store.get(template_id);

        let mut enabled: Vec<_> = entry.sections.iter().filter(|s| s.enabled).collect();
        // sort_by_key is stable: equal orders keep authoring order
        enabled.sort_by_key(|s| s.order);

        let mut sections = Vec::with_capacity(enabled.len());
        let mut warnings = Vec::new();

        for section in enabled {
            match self.registry.lookup(&section.kind, &section.variant) {
                Some(found) => {
                    if found.fallback {
                        tracing::debug!(
                            "Section '{}' uses {} (no {}/{} registered)",
                            section.id,
                            found.key,
                            section.kind,
                            section.variant
                        );
                    }
                    sections.push(ResolvedSection {
                        id: section.id.clone(),
                        variant: section.variant.clone(),
                        component: found.key,
                        renderer: found.renderer,
                        properties: section.properties.clone(),
                    });
                }
                None => {
                    let message = format!(
                        "Section '{}' skipped: no component for {}",
                        section.id,
                        ComponentKey::new(&section.kind, &section.variant)
                    );
                    tracing::warn!("{} (template '{}')", message, template_id);
                    warnings.push(message);
                }
            }
        }

        Resolution {
            template_id: template_id.to_string(),
            template_name: entry.name.clone(),
            used_default,
            sections,
            warnings,
        }
    }
}
