//! Built-in checks, grouped by report category.

mod components;
mod configuration;
mod integration;
mod structure;

pub use components::{missing_core_sections, ComponentCountCheck, CoreSectionsCheck, ManualMergeCheck};
pub use configuration::{
    ConfigArtifactCheck, DefaultTemplateCheck, SectionsResolvableCheck, TemplatesConfiguredCheck,
};
pub use integration::RegistryConsumersCheck;
pub use structure::{CanonicalDirCheck, ExportManifestCheck, LegacyDirectoriesCheck};
