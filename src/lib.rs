//! storeforge - section consolidation and page composition for multi-theme
//! storefront templates.
//!
//! A storefront project grows one directory per theme (`home-fashion/`,
//! `home-electronic/`, ...), each with its own copy of the same page
//! sections. storeforge finds the duplicates, migrates them into one
//! canonical directory driven by a template configuration artifact, grades
//! the result, and removes the legacy directories behind a verified backup.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`cleanup`] - Backup, restore and guarded deletion of legacy directories
//! - [`components`] - Section renderer registry keyed by kind and variant
//! - [`compose`] - Template resolution into an ordered section list
//! - [`config`] - Tool settings loading
//! - [`error`] - Error types and result aliases
//! - [`migrate`] - Migration planning and application
//! - [`scan`] - Duplicate section detection across template directories
//! - [`store`] - The template configuration artifact
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`validate`] - Post-migration checks and the graded report
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use storeforge::components::{CanonicalComponent, ComponentRegistry};
//! use storeforge::compose::Resolver;
//! use storeforge::store::{SectionDescriptor, TemplateEntry, TemplateStore};
//!
//! let mut store = TemplateStore::new();
//! store
//!     .insert(
//!         "home-fashion",
//!         TemplateEntry::new("Home Fashion", 1)
//!             .with_section(SectionDescriptor::new("products-2", "products", 2))
//!             .with_section(SectionDescriptor::new("hero-1", "hero", 1)),
//!     )
//!     .unwrap();
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register("hero", "default", Arc::new(CanonicalComponent::new("Hero", "shared/Hero.jsx")));
//! registry.register("products", "default", Arc::new(CanonicalComponent::new("Products", "shared/Products.jsx")));
//!
//! let sections = Resolver::new(&store, &registry).resolve("home-fashion");
//! let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
//! assert_eq!(ids, ["hero-1", "products-2"]);
//! ```

pub mod cleanup;
pub mod cli;
pub mod components;
pub mod compose;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod migrate;
pub mod scan;
pub mod store;
pub mod ui;
pub mod validate;

pub use error::{Result, StoreforgeError};
