//! List command implementation.
//!
//! The `storeforge list` command shows the configured templates, the
//! unified section catalog and any legacy directories left.

use std::path::PathBuf;

use crate::cli::args::ListArgs;
use crate::components::ComponentRegistry;
use crate::error::Result;
use crate::scan::Scanner;
use crate::store::TemplateStore;
use crate::ui::{Summary, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::prepare;
use super::scan::relative;

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
    config: Option<PathBuf>,
}

impl ListCommand {
    pub fn new(args: ListArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.args.root;
        let settings = prepare(root, self.config.as_deref(), ui)?;
        let store = TemplateStore::load_or_default(&settings.config_path(root))?;
        let registry = ComponentRegistry::from_canonical_dir(root, &settings)?;

        ui.show_header("Templates");
        if store.is_empty() {
            ui.message("No templates configured");
        } else {
            let mut table = Table::new(&["Template", "Name", "Sections"]).align_right(2);
            for id in store.list() {
                let entry = store.get(id);
                let enabled = entry.sections.iter().filter(|s| s.enabled).count();
                table.add_row(&[id.to_string(), entry.name.clone(), enabled.to_string()]);
            }
            ui.message(&table.render());
        }

        ui.show_header("Unified sections");
        if registry.is_empty() {
            ui.message("No unified sections");
        } else {
            let mut table = Table::new(&["Component", "Source"]);
            for key in registry.keys() {
                let source = registry
                    .lookup(key.kind(), key.variant())
                    .and_then(|found| found.renderer.source().map(|p| relative(root, p)))
                    .unwrap_or_default();
                table.add_row(&[key.to_string(), source]);
            }
            ui.message(&table.render());
        }

        let legacy = Scanner::new(&settings).template_dirs(root).unwrap_or_default();
        if !legacy.is_empty() {
            let names: Vec<&str> = legacy.iter().map(|(name, _)| name.as_str()).collect();
            ui.message(&format!("Legacy directories: {}", names.join(", ")));
        }

        ui.show_summary(
            &Summary::new("List")
                .count("templates", store.len())
                .count("sections", registry.len())
                .count("legacy", legacy.len()),
        );
        Ok(CommandResult::success())
    }
}
