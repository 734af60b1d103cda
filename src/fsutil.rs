//! Filesystem helpers shared by the scanner, planner and backup code.
//!
//! Directory listings are always returned sorted by file name so that every
//! consumer sees the same order on every platform.

use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List the entries of a directory, sorted by file name.
pub fn sorted_entries(dir: &Path) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

/// Everything found under a directory, as paths relative to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    /// Subdirectories, parents before children.
    pub dirs: Vec<PathBuf>,
    /// Regular files.
    pub files: Vec<PathBuf>,
    /// Symbolic links and their unresolved targets. Links are never followed.
    pub links: Vec<(PathBuf, PathBuf)>,
}

/// Recursively list `dir`, sorted.
///
/// Fails on any entry that is neither a regular file, a directory nor a
/// symbolic link (sockets, FIFOs, device nodes), naming that entry.
pub fn list_tree(dir: &Path) -> Result<TreeListing, (PathBuf, io::Error)> {
    let mut listing = TreeListing::default();
    list_tree_into(dir, Path::new(""), &mut listing)?;
    Ok(listing)
}

fn list_tree_into(
    dir: &Path,
    prefix: &Path,
    listing: &mut TreeListing,
) -> Result<(), (PathBuf, io::Error)> {
    for entry in sorted_entries(dir).map_err(|e| (dir.to_path_buf(), e))? {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| (path.clone(), e))?;
        let rel = prefix.join(entry.file_name());
        if file_type.is_symlink() {
            let target = fs::read_link(&path).map_err(|e| (path.clone(), e))?;
            listing.links.push((rel, target));
        } else if file_type.is_dir() {
            listing.dirs.push(rel.clone());
            list_tree_into(&path, &rel, listing)?;
        } else if file_type.is_file() {
            listing.files.push(rel);
        } else {
            let err = io::Error::new(
                io::ErrorKind::Unsupported,
                "not a regular file, directory or symbolic link",
            );
            return Err((path, err));
        }
    }
    Ok(())
}

/// Recursively list every regular file under `dir`, sorted, as paths
/// relative to `dir`.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    list_tree(dir).map(|listing| listing.files).map_err(|(_, e)| e)
}

/// SHA-256 of a file's contents, hex encoded.
pub fn sha256_file(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(&digest[..]))
}

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Returns `true` when a write happened. Parent directories are created.
pub fn write_if_changed(path: &Path, content: &str) -> anyhow::Result<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            return Ok(false);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Copy the tree under `src` into `dst`, preserving relative paths.
///
/// Symbolic links are recreated as links with the same target. Anything at
/// a link's destination is replaced. Stops at the first failure and reports
/// the path that failed. Returns what was copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<TreeListing, (PathBuf, io::Error)> {
    if dst.starts_with(src) {
        let err = io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination is inside the source {}", src.display()),
        );
        return Err((dst.to_path_buf(), err));
    }
    let listing = list_tree(src)?;

    fs::create_dir_all(dst).map_err(|e| (dst.to_path_buf(), e))?;
    for rel in &listing.dirs {
        let to = dst.join(rel);
        fs::create_dir_all(&to).map_err(|e| (to.clone(), e))?;
    }
    for rel in &listing.files {
        let to = dst.join(rel);
        fs::copy(src.join(rel), &to).map_err(|e| (to.clone(), e))?;
    }
    for (rel, target) in &listing.links {
        let to = dst.join(rel);
        if fs::symlink_metadata(&to).is_ok() {
            fs::remove_file(&to).map_err(|e| (to.clone(), e))?;
        }
        symlink(target, &to).map_err(|e| (to.clone(), e))?;
    }

    Ok(listing)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links can only be copied on unix",
    ))
}

/// Convert a PascalCase or camelCase file stem into kebab-case.
///
/// `FeaturedProducts` becomes `featured-products`; names that are already
/// kebab or snake case are lower-cased with `_` turned into `-`.
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if (prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower))
                && !out.ends_with('-')
            {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }
    out.trim_end_matches('-').to_string()
}
