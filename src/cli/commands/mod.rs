//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command that works on a
//! template root loads the root's settings first and ends with a
//! structured summary, whatever the outcome.

pub mod cleanup;
pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod migrate;
pub mod resolve;
pub mod restore;
pub mod scan;
pub mod schema;
pub mod validate;

use std::path::Path;

use crate::config::{load_settings, Settings};
use crate::error::Result;
use crate::ui::{OutputMode, UserInterface};

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

/// Load the settings for `root` and apply their default output mode when
/// no output flag was given.
pub(crate) fn prepare(
    root: &Path,
    config: Option<&Path>,
    ui: &mut dyn UserInterface,
) -> Result<Settings> {
    let settings = load_settings(root, config)?;
    if ui.output_mode() == OutputMode::Normal {
        ui.set_output_mode(settings.default_output.into());
    }
    Ok(settings)
}
