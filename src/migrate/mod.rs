//! Auto-migration.
//!
//! - [`planner`] turns a scan report into a [`MigrationPlan`]
//! - [`apply`] writes the plan: unified shells, the configuration artifact,
//!   and the export manifest
//! - [`shell`], [`exports`] and [`variant`] hold the generators and the
//!   variant heuristic
//!
//! # Example
//!
//! ```
//! use std::fs;
//! use storeforge::config::Settings;
//! use storeforge::migrate::{Migrator, Planner};
//! use storeforge::scan::Scanner;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! for dir in ["home-electronic", "home-fashion"] {
//!     fs::create_dir_all(temp.path().join(dir)).unwrap();
//!     fs::write(temp.path().join(dir).join("Hero.jsx"), "export default () => null;\n").unwrap();
//! }
//!
//! let settings = Settings::default();
//! let report = Scanner::new(&settings).scan(temp.path());
//! let plan = Planner::new(&settings).plan(&report);
//! let result = Migrator::new(&settings).apply(&plan).unwrap();
//!
//! assert_eq!(result.migrated, vec!["Hero".to_string()]);
//! assert!(temp.path().join("shared/Hero.jsx").exists());
//! ```

pub mod apply;
pub mod exports;
pub mod planner;
pub mod shell;
pub mod variant;

pub use apply::{KindStatus, MigrationResult, Migrator};
pub use planner::{display_name, regenerate_template, Consolidation, MigrationPlan, PlanIssue, Planner};
pub use shell::{read_marker, render_shell, MARKER_PREFIX};
pub use variant::{guess_variant, VARIANT_VOCABULARY};
