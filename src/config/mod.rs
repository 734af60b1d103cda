//! Tool settings for storeforge.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use storeforge::config::load_settings;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".storeforge")).unwrap();
//! fs::write(temp.path().join(".storeforge/config.yml"), "canonical_dir: common").unwrap();
//!
//! let settings = load_settings(temp.path(), None).unwrap();
//! assert_eq!(settings.canonical_dir, "common");
//! ```
//!
//! The template configuration artifact (the section layout of every
//! template) is not a tool setting; it lives in [`crate::store`].

pub mod loader;
pub mod schema;

pub use loader::{
    load_settings, load_settings_file, parse_settings, settings_path, validate_settings, STATE_DIR,
};
pub use schema::{OutputMode, Settings};
