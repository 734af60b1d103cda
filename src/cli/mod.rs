//! Command-line interface for storeforge.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    ApplyArgs, CleanupArgs, Cli, Commands, CompletionsArgs, ListArgs, ResolveArgs, RestoreArgs,
    ScanArgs, ValidateArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
