//! The component registry.
//!
//! A static table from [`ComponentKey`] to an opaque [`Renderer`]. Lookups
//! fall back from `(kind, variant)` to `(kind, "default")`; nothing else.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::fsutil::sorted_entries;

use super::key::{ComponentKey, DEFAULT_VARIANT};

/// An opaque renderable unit.
///
/// The registry never looks inside a renderer; the rendering layer does.
pub trait Renderer: fmt::Debug + Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Where the implementation lives, if it is file-backed.
    fn source(&self) -> Option<&Path> {
        None
    }
}

/// A unified section implementation in the canonical directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalComponent {
    name: String,
    path: PathBuf,
}

impl CanonicalComponent {
    /// Create a component backed by a file.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl Renderer for CanonicalComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone)]
pub struct ComponentMatch {
    /// The key that actually matched (the fallback key if `fallback` is set).
    pub key: ComponentKey,
    /// The renderer registered under `key`.
    pub renderer: Arc<dyn Renderer>,
    /// Whether the requested variant missed and the default variant was used.
    pub fallback: bool,
}

/// Registry of renderers keyed by `(kind, variant)`.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<ComponentKey, Arc<dyn Renderer>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the unified sections in the canonical directory.
    ///
    /// Each section file registers under `(kind, "default")`; the unified
    /// shells take the variant as a property, so one registration serves
    /// every variant through the default fallback. A missing directory
    /// yields an empty registry.
    pub fn from_canonical_dir(root: &Path, settings: &Settings) -> Result<Self> {
        let mut registry = Self::new();
        let dir = settings.canonical_path(root);
        if !dir.is_dir() {
            tracing::debug!("Canonical directory {} does not exist", dir.display());
            return Ok(registry);
        }

        for entry in sorted_entries(&dir)? {
            let path = entry.path();
            if !entry.file_type()?.is_file() {
                continue;
            }
            let (Some(stem), Some(ext)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|e| e.to_str()),
            ) else {
                continue;
            };
            if !settings.is_section_extension(ext) || settings.is_ignored_stem(stem) {
                continue;
            }
            registry.register(
                stem,
                DEFAULT_VARIANT,
                Arc::new(CanonicalComponent::new(stem, &path)),
            );
        }

        Ok(registry)
    }

    /// Register a renderer.
    ///
    /// Re-registering an existing key replaces the previous renderer (last
    /// write wins). This lets a project override a stock section by
    /// registering its own after the defaults; the replaced renderer is
    /// returned so callers can detect an accidental double registration.
    pub fn register(
        &mut self,
        kind: &str,
        variant: &str,
        renderer: Arc<dyn Renderer>,
    ) -> Option<Arc<dyn Renderer>> {
        let key = ComponentKey::new(kind, variant);
        let previous = self.components.insert(key.clone(), renderer);
        if let Some(ref prev) = previous {
            tracing::debug!("Component {} re-registered (replaced '{}')", key, prev.name());
        }
        previous
    }

    /// Look up a renderer, falling back to the default variant.
    pub fn lookup(&self, kind: &str, variant: &str) -> Option<ComponentMatch> {
        let key = ComponentKey::new(kind, variant);
        if let Some(renderer) = self.components.get(&key) {
            return Some(ComponentMatch {
                key,
                renderer: Arc::clone(renderer),
                fallback: false,
            });
        }

        let fallback = key.fallback()?;
        self.components.get(&fallback).map(|renderer| ComponentMatch {
            key: fallback,
            renderer: Arc::clone(renderer),
            fallback: true,
        })
    }

    /// Whether any variant of a kind is registered.
    pub fn has_kind(&self, kind: &str) -> bool {
        let kind = ComponentKey::default_for(kind);
        self.components.keys().any(|k| k.kind() == kind.kind())
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<&ComponentKey> {
        let mut keys: Vec<_> = self.components.keys().collect();
        keys.sort();
        keys
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
