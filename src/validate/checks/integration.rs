//! Integration checks.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fsutil::sorted_entries;
use crate::validate::{Category, Check, CheckId, CheckResult, ValidationContext};

/// How deep the consumer search walks below each search root.
const MAX_DEPTH: usize = 6;

/// Something imports from the canonical directory.
///
/// Searches `consumer_paths` when configured, otherwise the parent of the
/// template root (the application around it).
pub struct RegistryConsumersCheck;

impl RegistryConsumersCheck {
    fn search_roots(ctx: &ValidationContext) -> Vec<PathBuf> {
        if ctx.settings.consumer_paths.is_empty() {
            ctx.root.parent().map(Path::to_path_buf).into_iter().collect()
        } else {
            ctx.settings
                .consumer_paths
                .iter()
                .map(|p| ctx.root.join(p))
                .collect()
        }
    }

    fn import_pattern(canonical_dir: &str) -> Option<Regex> {
        let dir = regex::escape(canonical_dir);
        Regex::new(&format!(
            r#"(?:from\s+|require\(\s*|import\(\s*)['"][^'"]*\b{}(?:/[^'"]*)?['"]"#,
            dir
        ))
        .ok()
    }

    fn find_consumers(
        &self,
        ctx: &ValidationContext,
        dir: &Path,
        depth: usize,
        pattern: &Regex,
        found: &mut Vec<PathBuf>,
    ) {
        // The canonical directory and the legacy templates are producers.
        if dir == ctx.root || depth > MAX_DEPTH {
            return;
        }
        let Ok(entries) = sorted_entries(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') || name == "node_modules" || name == "target" {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                self.find_consumers(ctx, &path, depth + 1, pattern, found);
            } else if file_type.is_file() {
                let is_source = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| ctx.settings.is_section_extension(e));
                if !is_source {
                    continue;
                }
                if let Ok(content) = fs::read_to_string(&path) {
                    if pattern.is_match(&content) {
                        found.push(path);
                    }
                }
            }
        }
    }
}

impl Check for RegistryConsumersCheck {
    fn id(&self) -> CheckId {
        CheckId::new("registry-consumers")
    }

    fn name(&self) -> &str {
        "Registry consumers"
    }

    fn category(&self) -> Category {
        Category::Integration
    }

    fn weight(&self) -> u32 {
        2
    }

    fn run(&self, ctx: &ValidationContext) -> CheckResult {
        let Some(pattern) = Self::import_pattern(&ctx.settings.canonical_dir) else {
            return CheckResult::fail("Cannot build the import pattern");
        };

        let mut found = Vec::new();
        for root in Self::search_roots(ctx) {
            self.find_consumers(ctx, &root, 0, &pattern, &mut found);
        }

        if found.is_empty() {
            CheckResult::warning(format!(
                "Nothing imports from '{}'",
                ctx.settings.canonical_dir
            ))
            .with_remediation(
                "Render pages through the export manifest, or list the app's source folders in consumer_paths",
            )
        } else {
            tracing::debug!("Registry consumers: {:?}", found);
            CheckResult::pass(format!("{} file(s) import unified sections", found.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::validate::CheckStatus;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn pattern_matches_imports() {
        let pattern = RegistryConsumersCheck::import_pattern("shared").unwrap();
        assert!(pattern.is_match("import { Hero } from '../templates/shared';"));
        assert!(pattern.is_match("import Hero from \"@/templates/shared/Hero\";"));
        assert!(pattern.is_match("const s = require('./shared/index.js');"));
        assert!(!pattern.is_match("import x from './sharedUtils';"));
        assert!(!pattern.is_match("// shared"));
    }

    #[test]
    fn finds_consumer_next_to_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("templates");
        write(&root, "shared/Hero.jsx", "");
        write(temp.path(), "pages/Home.jsx", "import { Hero } from '../templates/shared';\n");

        let ctx = ValidationContext::load(&root, &Settings::default());
        assert_eq!(RegistryConsumersCheck.run(&ctx).status, CheckStatus::Pass);
    }

    #[test]
    fn templates_themselves_do_not_count() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("templates");
        write(&root, "home/Page.jsx", "import { Hero } from '../shared';\n");

        let ctx = ValidationContext::load(&root, &Settings::default());
        assert_eq!(RegistryConsumersCheck.run(&ctx).status, CheckStatus::Warning);
    }

    #[test]
    fn consumer_paths_override_search() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "app/Home.tsx", "import { Hero } from '../shared';\n");
        let settings = Settings {
            consumer_paths: vec![PathBuf::from("app")],
            ..Settings::default()
        };
        // The consumer lives under the root here, reached through consumer_paths.
        let ctx = ValidationContext::load(temp.path(), &settings);
        assert_eq!(RegistryConsumersCheck.run(&ctx).status, CheckStatus::Pass);
    }
}
