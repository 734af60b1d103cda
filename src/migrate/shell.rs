//! Unified section shells.
//!
//! A shell is the placeholder implementation written to the canonical
//! directory for each consolidated section. It accepts `variant`, `title`,
//! `subtitle` and passes every other property through. The divergent logic of
//! the duplicated sources is NOT merged; that stays a manual step.

use crate::fsutil::to_kebab_case;

/// First line of every generated shell.
pub const MARKER_PREFIX: &str = "// storeforge:kind=";

/// The kind recorded in a shell's marker line, if it has one.
pub fn read_marker(content: &str) -> Option<&str> {
    let first = content.lines().next()?;
    let kind = first.trim_end().strip_prefix(MARKER_PREFIX)?;
    (!kind.is_empty()).then_some(kind)
}

/// Render the shell for a section kind.
///
/// `sources` are display labels of every duplicate, canonical source first.
pub fn render_shell(kind: &str, sources: &[String]) -> String {
    let css = to_kebab_case(kind);
    let mut out = String::new();

    out.push_str(&format!("{}{}\n", MARKER_PREFIX, kind));
    out.push_str(&format!("// Unified {} section.\n", kind));
    out.push_str("//\n");
    out.push_str("// Consolidated from:\n");
    for (i, source) in sources.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("//   - {} (canonical)\n", source));
        } else {
            out.push_str(&format!("//   - {}\n", source));
        }
    }
    out.push_str("//\n");
    out.push_str("// The sources above diverge. Merge their logic into this file by hand.\n");
    out.push_str("// Keep the first line: it marks the section as already migrated.\n");
    out.push('\n');
    out.push_str("import React from 'react';\n");
    out.push('\n');
    out.push_str(&format!(
        "export default function {}({{ variant = 'default', title, subtitle, ...props }}) {{\n",
        kind
    ));
    out.push_str("  return (\n");
    out.push_str(&format!(
        "    <section className={{`{css} {css}--${{variant}}`}} data-section=\"{css}\" data-variant={{variant}} {{...props}}>\n",
        css = css
    ));
    out.push_str("      {title && <h2>{title}</h2>}\n");
    out.push_str("      {subtitle && <p>{subtitle}</p>}\n");
    out.push_str("    </section>\n");
    out.push_str("  );\n");
    out.push_str("}\n");
    out
}
