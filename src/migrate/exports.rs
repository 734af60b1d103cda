//! Export manifest generation.
//!
//! The manifest re-exports every unified section in the canonical directory
//! under a PascalCase name, sorted, so consumers import sections from one place.

use std::path::Path;

use crate::config::Settings;
use crate::fsutil::sorted_entries;

/// First line of a generated export manifest.
pub const EXPORT_MARKER: &str = "// storeforge:export-manifest";

/// Whether an existing manifest was generated by this tool.
pub fn is_generated_manifest(content: &str) -> bool {
    content.lines().next().map(str::trim_end) == Some(EXPORT_MARKER)
}

/// Section file stems currently in the canonical directory, sorted.
pub fn canonical_stems(root: &Path, settings: &Settings) -> std::io::Result<Vec<String>> {
    let dir = settings.canonical_path(root);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut stems = Vec::new();
    for entry in sorted_entries(&dir)? {
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|e| e.to_str()),
        ) else {
            continue;
        };
        if settings.is_section_extension(ext) && !settings.is_ignored_stem(stem) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    stems.dedup();
    Ok(stems)
}

/// Render the manifest for a set of section file stems.
pub fn render_manifest(stems: &[String]) -> String {
    let mut names: Vec<(String, &str)> = stems
        .iter()
        .map(|stem| (export_name(stem), stem.as_str()))
        .collect();
    names.sort();

    let mut out = String::new();
    out.push_str(EXPORT_MARKER);
    out.push('\n');
    out.push_str("// Generated by storeforge apply-migration. Regenerated on every run.\n");
    out.push('\n');
    for (name, stem) in names {
        out.push_str(&format!("export {{ default as {} }} from './{}';\n", name, stem));
    }
    out
}

/// A JavaScript identifier for a file stem (`featured-products` becomes
/// `FeaturedProducts`).
pub fn export_name(stem: &str) -> String {
    let mut name = String::with_capacity(stem.len());
    for part in stem.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    if name.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        name.insert_str(0, "Section");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn export_names() {
        assert_eq!(export_name("Hero"), "Hero");
        assert_eq!(export_name("featured-products"), "FeaturedProducts");
        assert_eq!(export_name("new_arrivals"), "NewArrivals");
        assert_eq!(export_name("2col"), "Section2col");
    }

    #[test]
    fn manifest_is_sorted() {
        let manifest = render_manifest(&["Hero".to_string(), "Footer".to_string()]);
        insta::assert_snapshot!(manifest, @r"
        // storeforge:export-manifest
        // Generated by storeforge apply-migration. Regenerated on every run.

        export { default as Footer } from './Footer';
        export { default as Hero } from './Hero';
        ");
        assert!(is_generated_manifest(&manifest));
    }

    #[test]
    fn hand_written_index_is_not_generated() {
        assert!(!is_generated_manifest("export * from './Hero';\n"));
    }

    #[test]
    fn stems_skip_config_and_index() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        for name in ["Hero.jsx", "Footer.tsx", "index.js", "templates.yml"] {
            fs::write(shared.join(name), "").unwrap();
        }
        let stems = canonical_stems(temp.path(), &Settings::default()).unwrap();
        assert_eq!(stems, vec!["Footer".to_string(), "Hero".to_string()]);
    }
}
