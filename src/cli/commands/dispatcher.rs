//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::cleanup::CleanupCommand;
use super::completions::CompletionsCommand;
use super::list::ListCommand;
use super::migrate::ApplyMigrationCommand;
use super::resolve::ResolveCommand;
use super::restore::RestoreCommand;
use super::scan::ScanCommand;
use super::schema::SchemaCommand;
use super::validate::ValidateCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Create a result from an exit code.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::success()
        } else {
            Self::failure(exit_code)
        }
    }
}

/// Dispatches CLI commands to their implementations.
#[derive(Debug, Default)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = cli.config.clone();
        match &cli.command {
            Commands::ScanAndPlan(args) => ScanCommand::new(args.clone(), config).execute(ui),
            Commands::ApplyMigration(args) => {
                ApplyMigrationCommand::new(args.clone(), config).execute(ui)
            }
            Commands::Cleanup(args) => CleanupCommand::new(args.clone(), config).execute(ui),
            Commands::Validate(args) => ValidateCommand::new(args.clone(), config).execute(ui),
            Commands::Restore(args) => RestoreCommand::new(args.clone()).execute(ui),
            Commands::Resolve(args) => ResolveCommand::new(args.clone(), config).execute(ui),
            Commands::List(args) => ListCommand::new(args.clone(), config).execute(ui),
            Commands::Schema => SchemaCommand.execute(ui),
            Commands::Completions(args) => CompletionsCommand::new(args.clone()).execute(ui),
        }
    }
}
