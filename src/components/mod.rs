//! Component registry.
//!
//! Maps `(kind, variant)` keys to opaque renderers:
//! - [`key`] - normalised [`ComponentKey`]s
//! - [`registry`] - the [`ComponentRegistry`] lookup table
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use storeforge::components::{CanonicalComponent, ComponentRegistry};
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register("hero", "default", Arc::new(CanonicalComponent::new("Hero", "shared/Hero.jsx")));
//!
//! // The electronic variant is not registered, so the default one answers.
//! let found = registry.lookup("hero", "electronic").unwrap();
//! assert!(found.fallback);
//! assert_eq!(found.renderer.name(), "Hero");
//! ```

pub mod key;
pub mod registry;

pub use key::{ComponentKey, DEFAULT_VARIANT};
pub use registry::{CanonicalComponent, ComponentMatch, ComponentRegistry, Renderer};
