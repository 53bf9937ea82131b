//! PBR coverage scanning.
//!
//! Walks a mod's `PBRNifPatcher` folder, reads every sidecar JSON and records
//! which base textures the mod claims to cover.

use crate::config::ScanConfig;
use crate::index::{ModScan, TextureIndex};
use crate::modlist::find_child_dir;
use crate::paths::{
    is_excluded, join_dir, normalize_path, split_parent, texture_key, with_texture_extension,
};
use crate::sidecar::{parse_sidecar, strip_textures_prefix, SidecarEntry};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Folder holding the patcher's sidecar JSON files.
pub const PATCHER_FOLDER: &str = "PBRNifPatcher";
/// Folder holding loose textures.
pub const TEXTURES_FOLDER: &str = "textures";
/// Subfolder of `textures` holding PBR texture sets.
pub const PBR_FOLDER: &str = "pbr";

/// Scanner for PBR coverage claims.
#[derive(Debug, Clone, Default)]
pub struct PbrCoverageScanner {
    config: ScanConfig,
}

/// Per-mod bookkeeping while walking sidecars.
struct ScanState<'a> {
    mod_name: &'a str,
    config: &'a ScanConfig,
    index: TextureIndex,
    log: Vec<String>,
    accepted: usize,
    excluded: usize,
}

impl<'a> ScanState<'a> {
    fn new(mod_name: &'a str, config: &'a ScanConfig) -> Self {
        Self {
            mod_name,
            config,
            index: TextureIndex::new(),
            log: Vec::new(),
            accepted: 0,
            excluded: 0,
        }
    }

    /// Record one resolved texture path unless policy rejects it.
    fn record(&mut self, texture_path: &str, dir_excluded: bool, source: &str) -> bool {
        if !texture_path.is_ascii() {
            self.excluded += 1;
            if self.excluded <= self.config.exclusion_sample_limit {
                self.log.push(format!("Excluded (non-ASCII chars): {}", texture_path));
            }
            return false;
        }

        let (dir, _) = split_parent(texture_path);
        if dir_excluded || is_excluded(dir) {
            self.excluded += 1;
            if self.excluded <= self.config.exclusion_sample_limit {
                self.log.push(format!("Excluded (patcher skip): {}", texture_path));
            }
            return false;
        }

        let identity = texture_key(texture_path);
        self.index.insert(identity.clone(), self.mod_name);
        self.accepted += 1;
        if self.accepted <= self.config.coverage_sample_limit {
            self.log.push(format!(
                "PBR Coverage: {} covers {} (base: {})",
                source, texture_path, identity
            ));
        }
        true
    }
}

impl PbrCoverageScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan one mod folder. A mod without a `PBRNifPatcher` folder yields an empty scan.
    ///
    /// Unreadable or malformed sidecars are logged and skipped.
    pub fn scan(&self, mod_name: &str, mod_path: &Path) -> ModScan {
        let Some(patcher_dir) = find_child_dir(mod_path, PATCHER_FOLDER) else {
            return ModScan::default();
        };

        let mut state = ScanState::new(mod_name, &self.config);
        state.log.push(format!("Found {} folder in '{}'", PATCHER_FOLDER, mod_name));

        for json_file in sidecar_files(&patcher_dir) {
            let entries = match std::fs::read(&json_file)
                .map_err(crate::Error::from)
                .and_then(|bytes| parse_sidecar(&bytes))
            {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Skipping sidecar {}: {}", json_file.display(), e);
                    state.log.push(format!("Error reading {}: {}", json_file.display(), e));
                    continue;
                }
            };

            let json_dir = relative_dir(&patcher_dir, &json_file);
            let source = json_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::debug!(
                "{}: {} entries in {} (dir '{}')",
                mod_name,
                entries.len(),
                source,
                json_dir
            );

            for entry in &entries {
                self.scan_entry(&mut state, entry, &json_dir, mod_path, &source);
            }
        }

        if state.accepted > 0 || state.excluded > 0 {
            state.log.push(format!(
                "'{}': Found {} PBR coverage entries, excluded {} technical paths",
                mod_name, state.accepted, state.excluded
            ));
        }

        ModScan {
            index: state.index,
            log: state.log,
        }
    }

    fn scan_entry(
        &self,
        state: &mut ScanState<'_>,
        entry: &SidecarEntry,
        json_dir: &str,
        mod_path: &Path,
        source: &str,
    ) {
        let dir_excluded = is_excluded(json_dir);

        let main_path = entry
            .texture
            .as_deref()
            .map(|reference| resolve_texture_reference(reference, json_dir, mod_path))
            .filter(|path| !path.is_empty());
        let main_identity = main_path.as_deref().map(texture_key);

        if let Some(path) = &main_path {
            state.record(path, dir_excluded, source);
        }

        for (slot, value) in &entry.slots {
            let slot_path = normalize_path(strip_textures_prefix(value));
            if slot_path.is_empty() {
                continue;
            }
            if main_identity.as_deref() == Some(texture_key(&slot_path).as_str()) {
                continue;
            }
            state.record(&slot_path, dir_excluded, &format!("{} ({})", source, slot));
        }
    }
}

/// Resolve an entry's `match_diffuse` / `texture` value to a texture path
/// relative to `textures/`.
///
/// The reference is placed under the sidecar's directory. A bare file name in
/// a sidecar at the patcher root is looked up under `textures/PBR` instead.
pub fn resolve_texture_reference(reference: &str, json_dir: &str, mod_path: &Path) -> String {
    let reference = normalize_path(reference);
    if reference.is_empty() {
        return reference;
    }

    if json_dir.is_empty() && !reference.contains('/') {
        if let Some(found) = find_pbr_texture(mod_path, &reference) {
            return found;
        }
    }

    normalize_path(&with_texture_extension(&join_dir(json_dir, &reference)))
}

/// Search `textures/PBR` for `<name>.dds`; returns its path relative to `textures/`.
fn find_pbr_texture(mod_path: &Path, name: &str) -> Option<String> {
    let textures_dir = find_child_dir(mod_path, TEXTURES_FOLDER)?;
    let pbr_dir = find_child_dir(&textures_dir, PBR_FOLDER)?;
    let wanted = with_texture_extension(name);

    WalkDir::new(&pbr_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .find(|e| e.file_name().to_string_lossy().eq_ignore_ascii_case(&wanted))
        .and_then(|e| {
            e.path()
                .strip_prefix(&textures_dir)
                .ok()
                .map(|rel| normalize_path(&rel.to_string_lossy()))
        })
}

/// All `*.json` files under the patcher folder, in a stable order.
fn sidecar_files(patcher_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(patcher_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Cannot walk {}: {}", patcher_dir.display(), err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .map(|e| e.into_path())
        .collect()
}

/// Normalized directory of `file` relative to `root`; empty at root.
fn relative_dir(root: &Path, file: &Path) -> String {
    file.parent()
        .and_then(|parent| parent.strip_prefix(root).ok())
        .map(|rel| normalize_path(&rel.to_string_lossy()))
        .unwrap_or_default()
}
