//! Template configuration store.
//!
//! - Schema definitions in [`schema`]
//! - The [`TemplateStore`] lookup with its default-template fallback in [`catalog`]
//!
//! # Example
//!
//! ```
//! use storeforge::store::{SectionDescriptor, TemplateEntry, TemplateStore};
//!
//! let mut store = TemplateStore::new();
//! store
//!     .insert(
//!         "home-electronic",
//!         TemplateEntry::new("Home Electronic", 1)
//!             .with_section(SectionDescriptor::new("hero-1", "hero", 1).with_variant("electronic")),
//!     )
//!     .unwrap();
//!
//! assert_eq!(store.get("home-electronic").name, "Home Electronic");
//! // Unknown ids fall back to the default template.
//! assert_eq!(store.get("nope"), store.get("default"));
//! ```

pub mod catalog;
pub mod schema;

pub use schema::{
    Properties, PropertyValue, SectionDescriptor, TemplateConfig, TemplateEntry, CONFIG_VERSION,
};
pub use catalog::{builtin_default_template, validate_template, TemplateStore, DEFAULT_TEMPLATE_ID};
