//! Template configuration schema.
//!
//! These structs map to the configuration artifact (`shared/templates.yml`
//! by default). Property values are a closed set of scalar and list types;
//! anything else (null, nested maps) is rejected when the file is parsed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::components::DEFAULT_VARIANT;

/// Current version of the configuration artifact format.
pub const CONFIG_VERSION: u32 = 1;

/// A single property value in a section's property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Get as a string slice if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as an integer if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as a bool if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A section's property bag, ordered by key.
pub type Properties = BTreeMap<String, PropertyValue>;

/// One section instance within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionDescriptor {
    /// Unique within its template (e.g. `hero-1`).
    pub id: String,

    /// Section category (e.g. `hero`, `products`).
    pub kind: String,

    /// Registry variant (e.g. `electronic`).
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Disabled sections stay in configuration but never render.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Render position; need not be contiguous.
    #[serde(default)]
    pub order: i64,

    /// Passed verbatim to the renderer.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

fn default_variant() -> String {
    DEFAULT_VARIANT.to_string()
}

fn default_enabled() -> bool {
    true
}

impl SectionDescriptor {
    /// Create an enabled, default-variant section.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            variant: default_variant(),
            enabled: true,
            order,
            properties: Properties::new(),
        }
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Set a property.
    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Mark the section disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A named, ordered bundle of sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateEntry {
    /// Display name.
    pub name: String,

    /// Catalog position (not section order).
    #[serde(default)]
    pub order: i64,

    /// Sections in authoring order.
    #[serde(default)]
    pub sections: Vec<SectionDescriptor>,
}

impl TemplateEntry {
    /// Create an empty template.
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        Self {
            name: name.into(),
            order,
            sections: Vec::new(),
        }
    }

    /// Add a section.
    pub fn with_section(mut self, section: SectionDescriptor) -> Self {
        self.sections.push(section);
        self
    }
}

/// Root of the configuration artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateConfig {
    /// Artifact format version.
    #[serde(default = "default_config_version")]
    pub version: u32,

    /// Templates keyed by identifier.
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateEntry>,
}

fn default_config_version() -> u32 {
    CONFIG_VERSION
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            templates: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_property_values() {
        let yaml = r#"
id: products-1
kind: products
order: 2
properties:
  title: Featured
  limit: 8
  ratio: 1.5
  showBadges: true
  tags: [new, sale]
"#;
        let section: SectionDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(section.variant, "default");
        assert!(section.enabled);
        assert_eq!(section.properties["title"].as_str(), Some("Featured"));
        assert_eq!(section.properties["limit"].as_i64(), Some(8));
        assert_eq!(section.properties["ratio"], PropertyValue::Float(1.5));
        assert_eq!(section.properties["showBadges"].as_bool(), Some(true));
        assert_eq!(
            section.properties["tags"],
            PropertyValue::List(vec!["new".into(), "sale".into()])
        );
    }

    #[test]
    fn rejects_null_property() {
        let yaml = "id: a\nkind: hero\nproperties:\n  title: ~\n";
        assert!(serde_yaml::from_str::<SectionDescriptor>(yaml).is_err());
    }

    #[test]
    fn rejects_nested_map_property() {
        let yaml = "id: a\nkind: hero\nproperties:\n  style:\n    color: red\n";
        assert!(serde_yaml::from_str::<SectionDescriptor>(yaml).is_err());
    }

    #[test]
    fn requires_id_and_kind() {
        assert!(serde_yaml::from_str::<SectionDescriptor>("kind: hero").is_err());
        assert!(serde_yaml::from_str::<SectionDescriptor>("id: hero-1").is_err());
    }

    #[test]
    fn property_display() {
        let list = PropertyValue::List(vec![PropertyValue::Integer(1), "two".into(), true.into()]);
        assert_eq!(list.to_string(), "[1, two, true]");
    }

    #[test]
    fn config_defaults_version() {
        let config: TemplateConfig = serde_yaml::from_str("templates: {}").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
    }
}
