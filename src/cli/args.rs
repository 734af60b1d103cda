//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::validate::ReportFormat;

/// Storeforge - Consolidate duplicated storefront sections into one registry.
#[derive(Debug, Parser)]
#[command(name = "storeforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides <root>/.storeforge/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inventory templates, list duplicated sections and preview the migration
    ScanAndPlan(ScanArgs),

    /// Consolidate duplicated sections and regenerate the template configuration
    ApplyMigration(ApplyArgs),

    /// Back up and delete legacy template directories
    Cleanup(CleanupArgs),

    /// Grade the current migration state
    Validate(ValidateArgs),

    /// Restore legacy template directories from a backup
    Restore(RestoreArgs),

    /// Show the sections a template renders
    Resolve(ResolveArgs),

    /// List templates and unified sections
    List(ListArgs),

    /// Print the JSON Schema of the template configuration
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `scan-and-plan` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ScanArgs {
    /// Template root directory
    pub root: PathBuf,

    /// Print the scan report and plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `apply-migration` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ApplyArgs {
    /// Template root directory
    pub root: PathBuf,

    /// Print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `cleanup` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CleanupArgs {
    /// Template root directory
    pub root: PathBuf,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ValidateArgs {
    /// Template root directory
    pub root: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: ReportFormat,
}

/// Arguments for the `restore` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RestoreArgs {
    /// Backup directory (the one holding manifest.json)
    pub backup: PathBuf,

    /// Restore into this root instead of the recorded one
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Copy over directories that already exist
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Template root directory
    pub root: PathBuf,

    /// Template identifier (unknown identifiers resolve the default template)
    pub template_id: String,

    /// Print the composition as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    /// Template root directory
    pub root: PathBuf,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cleanup_with_yes() {
        let cli = Cli::parse_from(["storeforge", "cleanup", "site/templates", "--yes"]);
        match cli.command {
            Commands::Cleanup(args) => {
                assert_eq!(args.root, PathBuf::from("site/templates"));
                assert!(args.yes);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["storeforge", "apply-migration", ".", "--dry-run", "--debug"]);
        assert!(cli.debug);
        assert!(matches!(
            cli.command,
            Commands::ApplyMigration(ApplyArgs { dry_run: true, .. })
        ));
    }

    #[test]
    fn parses_validate_format() {
        let cli = Cli::parse_from(["storeforge", "validate", ".", "--format", "json"]);
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.format, ReportFormat::Json),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn root_is_required() {
        assert!(Cli::try_parse_from(["storeforge", "scan-and-plan"]).is_err());
    }
}
