//! Component keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fsutil::to_kebab_case;

/// Variant used when a section does not name one.
pub const DEFAULT_VARIANT: &str = "default";

/// A `(kind, variant)` pair identifying one renderable unit.
///
/// Kinds are normalised to kebab-case (`FeaturedProducts` and
/// `featured-products` are the same kind) and variants to lower case, so keys
/// derived from file names and keys written in configuration compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentKey {
    kind: String,
    variant: String,
}

impl ComponentKey {
    /// Create a normalised key.
    pub fn new(kind: &str, variant: &str) -> Self {
        let variant = variant.trim();
        Self {
            kind: to_kebab_case(kind.trim()),
            variant: if variant.is_empty() {
                DEFAULT_VARIANT.to_string()
            } else {
                variant.to_lowercase()
            },
        }
    }

    /// Key for the default variant of a kind.
    pub fn default_for(kind: &str) -> Self {
        Self::new(kind, DEFAULT_VARIANT)
    }

    /// The normalised section kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The normalised variant.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Whether this key names the default variant.
    pub fn is_default_variant(&self) -> bool {
        self.variant == DEFAULT_VARIANT
    }

    /// The fallback key consulted when this one misses.
    pub fn fallback(&self) -> Option<Self> {
        if self.is_default_variant() {
            None
        } else {
            Some(Self {
                kind: self.kind.clone(),
                variant: DEFAULT_VARIANT.to_string(),
            })
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.variant)
    }
}

impl FromStr for ComponentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, variant) = match s.split_once('/') {
            Some((k, v)) => (k, v),
            None => (s, DEFAULT_VARIANT),
        };
        if kind.trim().is_empty() {
            return Err(format!("component key '{}' has an empty kind", s));
        }
        if variant.contains('/') {
            return Err(format!("component key '{}' has more than one '/'", s));
        }
        Ok(Self::new(kind, variant))
    }
}
