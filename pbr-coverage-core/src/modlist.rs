//! Enabled-mod input.
//!
//! The checker consumes a flat list of (mod name, folder) pairs. These are
//! read either from a plain mods directory or from a Mod Organizer
//! `modlist.txt` profile file.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Name suffix Mod Organizer uses for separator pseudo-mods.
const SEPARATOR_SUFFIX: &str = "_separator";

/// An enabled mod and its folder on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModEntry {
    pub name: String,
    pub path: PathBuf,
}

impl ModEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Every immediate subdirectory of `mods_dir` is treated as an enabled mod.
pub fn load_mods_dir(mods_dir: &Path) -> crate::Result<Vec<ModEntry>> {
    let mut mods = Vec::new();
    for entry in std::fs::read_dir(mods_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(SEPARATOR_SUFFIX) {
            continue;
        }
        mods.push(ModEntry::new(name, path));
    }
    mods.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(mods)
}

/// Enabled mods from a `modlist.txt`, in file order.
///
/// `+Name` is enabled, `-Name` disabled, `*Name` unmanaged; `#` starts a
/// comment. Separators and mods without a folder under `mods_dir` are skipped.
pub fn load_modlist(mods_dir: &Path, modlist: &Path) -> crate::Result<Vec<ModEntry>> {
    let content = std::fs::read_to_string(modlist)?;
    Ok(parse_modlist(mods_dir, &content))
}

pub fn parse_modlist(mods_dir: &Path, content: &str) -> Vec<ModEntry> {
    let mut mods = Vec::new();
    for line in content.lines() {
        let line = line.trim_start_matches('\u{feff}').trim();
        let Some(name) = line.strip_prefix('+') else {
            continue;
        };
        if name.is_empty() || name.ends_with(SEPARATOR_SUFFIX) {
            continue;
        }
        let path = mods_dir.join(name);
        if !path.is_dir() {
            tracing::warn!("Enabled mod '{}' has no folder at {}", name, path.display());
            continue;
        }
        mods.push(ModEntry::new(name, path));
    }
    mods
}

/// Find a direct child directory by name, falling back to a case-insensitive match.
pub fn find_child_dir(parent: &Path, name: &str) -> Option<PathBuf> {
    let exact = parent.join(name);
    if exact.is_dir() {
        return Some(exact);
    }
    std::fs::read_dir(parent)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mods_dir_lists_subfolders_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("Zeta")).unwrap();
        std::fs::create_dir_all(tmp.path().join("Alpha")).unwrap();
        std::fs::create_dir_all(tmp.path().join("Armor_separator")).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let mods = load_mods_dir(tmp.path()).unwrap();
        let names: Vec<_> = mods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn modlist_keeps_enabled_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["PBR Armor", "Regular Armor", "Disabled Mod"] {
            std::fs::create_dir_all(tmp.path().join(name)).unwrap();
        }
        let content = "# This file was automatically generated\n\
                       +Regular Armor\n\
                       -Disabled Mod\n\
                       *DLC: Dawnguard\n\
                       +Armor_separator\n\
                       +PBR Armor\n\
                       +Missing Folder\n";
        let mods = parse_modlist(tmp.path(), content);
        let names: Vec<_> = mods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Regular Armor", "PBR Armor"]);
    }

    #[test]
    fn child_dir_lookup_ignores_case() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("Textures")).unwrap();
        let found = find_child_dir(tmp.path(), "textures").unwrap();
        assert!(found.is_dir());
        assert_eq!(found.parent(), Some(tmp.path()));
        assert!(find_child_dir(tmp.path(), "PBRNifPatcher").is_none());
    }
}
