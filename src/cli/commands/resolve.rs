//! Resolve command implementation.
//!
//! The `storeforge resolve` command shows the sections a template renders,
//! in order, with the component that renders each one.

use serde::Serialize;
use std::path::PathBuf;

use crate::cli::args::ResolveArgs;
use crate::components::ComponentRegistry;
use crate::compose::{Resolution, Resolver};
use crate::error::Result;
use crate::store::{Properties, TemplateStore};
use crate::ui::{Summary, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::prepare;
use super::scan::relative;

#[derive(Serialize)]
struct JsonSection<'a> {
    id: &'a str,
    variant: &'a str,
    component: String,
    renderer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    properties: &'a Properties,
}

#[derive(Serialize)]
struct JsonResolution<'a> {
    template_id: &'a str,
    template_name: &'a str,
    used_default: bool,
    sections: Vec<JsonSection<'a>>,
    warnings: &'a [String],
}

impl<'a> JsonResolution<'a> {
    fn new(resolution: &'a Resolution) -> Self {
        Self {
            template_id: &resolution.template_id,
            template_name: &resolution.template_name,
            used_default: resolution.used_default,
            sections: resolution
                .sections
                .iter()
                .map(|s| JsonSection {
                    id: &s.id,
                    variant: &s.variant,
                    component: s.component.to_string(),
                    renderer: s.renderer.name(),
                    source: s.renderer.source().map(|p| p.display().to_string()),
                    properties: &s.properties,
                })
                .collect(),
            warnings: &resolution.warnings,
        }
    }
}

/// The resolve command implementation.
pub struct ResolveCommand {
    args: ResolveArgs,
    config: Option<PathBuf>,
}

impl ResolveCommand {
    pub fn new(args: ResolveArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.args.root;
        let settings = prepare(root, self.config.as_deref(), ui)?;

        let store = match TemplateStore::load_or_default(&settings.config_path(root)) {
            Ok(store) => store,
            Err(e) => {
                ui.error(&e.to_string());
                if !self.args.json {
                    ui.show_summary(&Summary::new("Resolve").count("sections", 0).success(false));
                }
                return Ok(CommandResult::failure(1));
            }
        };
        let registry = ComponentRegistry::from_canonical_dir(root, &settings)?;
        let resolution = Resolver::new(&store, &registry).resolve_detailed(&self.args.template_id);

        if self.args.json {
            let json = serde_json::to_string_pretty(&JsonResolution::new(&resolution))
                .map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!(
            "{} ({})",
            resolution.template_name, resolution.template_id
        ));
        if resolution.used_default {
            ui.warning(&format!(
                "Unknown template '{}', showing the default template",
                self.args.template_id
            ));
        }

        if resolution.sections.is_empty() {
            ui.message("No sections to render");
        } else {
            let mut table = Table::new(&["#", "Section", "Component", "Source"]).align_right(0);
            for (i, section) in resolution.sections.iter().enumerate() {
                let source = section
                    .renderer
                    .source()
                    .map(|p| relative(root, p))
                    .unwrap_or_default();
                table.add_row(&[
                    (i + 1).to_string(),
                    section.id.clone(),
                    section.component.to_string(),
                    source,
                ]);
            }
            ui.message(&table.render());
        }
        for warning in &resolution.warnings {
            ui.warning(warning);
        }

        ui.show_summary(
            &Summary::new("Resolve")
                .count("sections", resolution.sections.len())
                .count("skipped", resolution.warnings.len()),
        );
        Ok(CommandResult::success())
    }
}
