//! The template configuration store.
//!
//! An explicit value handed to the resolver; there is no process-wide
//! template table. Several stores can coexist (one per test, one per root).

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{Result, StoreforgeError};

use super::schema::{SectionDescriptor, TemplateConfig, TemplateEntry, CONFIG_VERSION};

/// Identifier of the fallback template.
pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// The built-in fallback template: hero, categories, products, footer.
pub fn builtin_default_template() -> TemplateEntry {
    TemplateEntry::new("Default", 0)
        .with_section(SectionDescriptor::new("hero-1", "hero", 1))
        .with_section(SectionDescriptor::new("categories-2", "categories", 2))
        .with_section(
            SectionDescriptor::new("products-3", "products", 3)
                .with_property("title", "Featured Products")
                .with_property("limit", 8i64),
        )
        .with_section(SectionDescriptor::new("footer-4", "footer", 4))
}

/// Maps template identifiers to their section layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateStore {
    templates: BTreeMap<String, TemplateEntry>,
    builtin_default: TemplateEntry,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a store holding only the built-in default template.
    pub fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
            builtin_default: builtin_default_template(),
        }
    }

    /// Build a store from a parsed configuration artifact.
    ///
    /// Fails when any template is malformed (see [`validate_template`]).
    pub fn from_config(config: TemplateConfig) -> Result<Self> {
        if config.version > CONFIG_VERSION {
            return Err(StoreforgeError::ConfigValidationError {
                message: format!(
                    "template configuration version {} is newer than supported version {}",
                    config.version, CONFIG_VERSION
                ),
            });
        }
        for (id, entry) in &config.templates {
            validate_template(id, entry)?;
        }
        Ok(Self {
            templates: config.templates,
            builtin_default: builtin_default_template(),
        })
    }

    /// Parse a configuration artifact from YAML.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        let config: TemplateConfig =
            serde_yaml::from_str(content).map_err(|e| StoreforgeError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// Load the configuration artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StoreforgeError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content, path)
    }

    /// Load the artifact if it exists, otherwise return an empty store.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Get a template, falling back to the default template.
    ///
    /// Unknown identifiers never fail: a misconfigured page renders the
    /// default layout instead of crashing. `get("anything-unknown")` and
    /// `get("default")` always return the same entry.
    pub fn get(&self, template_id: &str) -> &TemplateEntry {
        match self.templates.get(template_id) {
            Some(entry) => entry,
            None => {
                tracing::debug!("Unknown template '{}', using default", template_id);
                self.default_template()
            }
        }
    }

    /// The default template: a stored `default` entry, else the built-in one.
    pub fn default_template(&self) -> &TemplateEntry {
        self.templates
            .get(DEFAULT_TEMPLATE_ID)
            .unwrap_or(&self.builtin_default)
    }

    /// Whether a template is explicitly configured.
    pub fn contains(&self, template_id: &str) -> bool {
        self.templates.contains_key(template_id)
    }

    /// Template identifiers in catalog order: `order` ascending, ties by id.
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<(&String, &TemplateEntry)> = self.templates.iter().collect();
        ids.sort_by(|(a_id, a), (b_id, b)| a.order.cmp(&b.order).then_with(|| a_id.cmp(b_id)));
        ids.into_iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Insert or replace a template wholesale, returning the previous entry.
    pub fn insert(&mut self, template_id: &str, entry: TemplateEntry) -> Result<Option<TemplateEntry>> {
        validate_template(template_id, &entry)?;
        Ok(self.templates.insert(template_id.to_string(), entry))
    }

    /// Number of configured templates (the built-in default is not counted).
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if no templates are configured.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Snapshot the store as a configuration artifact.
    pub fn to_config(&self) -> TemplateConfig {
        TemplateConfig {
            version: CONFIG_VERSION,
            templates: self.templates.clone(),
        }
    }

    /// Serialise the store as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.to_config()).map_err(|e| {
            StoreforgeError::Other(anyhow::anyhow!("Failed to serialise templates: {}", e))
        })
    }
}

/// Check one template for problems the resolver cannot tolerate.
///
/// Section ids must be unique and non-empty, and every section needs a kind.
pub fn validate_template(template_id: &str, entry: &TemplateEntry) -> Result<()> {
    let malformed = |message: String| StoreforgeError::MalformedTemplate {
        template: template_id.to_string(),
        message,
    };

    if template_id.trim().is_empty() {
        return Err(malformed("template id is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for section in &entry.sections {
        if section.id.trim().is_empty() {
            return Err(malformed("a section has an empty id".to_string()));
        }
        if section.kind.trim().is_empty() {
            return Err(malformed(format!("section '{}' has an empty kind", section.id)));
        }
        if !seen.insert(section.id.as_str()) {
            return Err(malformed(format!("duplicate section id '{}'", section.id)));
        }
    }
    Ok(())
}
