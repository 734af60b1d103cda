//! Schema command implementation.
//!
//! The `storeforge schema` command prints the JSON Schema of the template
//! configuration artifact, for editor validation.

use std::io::Write;

use crate::error::Result;
use crate::store::TemplateConfig;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// JSON Schema of the template configuration artifact.
pub fn template_config_schema() -> Result<String> {
    let schema = schemars::schema_for!(TemplateConfig);
    Ok(serde_json::to_string_pretty(&schema).map_err(anyhow::Error::from)?)
}

/// The schema command implementation.
pub struct SchemaCommand;

impl Command for SchemaCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let schema = template_config_schema()?;
        writeln!(std::io::stdout(), "{}", schema)?;
        Ok(CommandResult::success())
    }
}
