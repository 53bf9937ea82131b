//! Regular (non-PBR) texture scanning.
//!
//! Walks a mod's `textures` folder and records the base identity of every
//! `.dds` that a PBR replacer could make redundant.

use crate::config::ScanConfig;
use crate::index::{ModScan, TextureIndex};
use crate::modlist::find_child_dir;
use crate::paths::{file_stem, is_excluded, is_pbr_owned, is_variant_map, normalize_path, split_parent, texture_key};
use crate::pbr_scanner::TEXTURES_FOLDER;
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

/// Outcome of classifying a single texture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureClass {
    /// A base texture, with its lower-cased identity
    Regular(String),
    NonAscii,
    PbrOwned,
    VariantMap,
    Excluded,
}

/// Classify a texture path relative to `textures/`.
pub fn classify_texture(relative_path: &str) -> TextureClass {
    let path = normalize_path(relative_path).to_lowercase();
    if !path.is_ascii() {
        return TextureClass::NonAscii;
    }
    if is_pbr_owned(&path) {
        return TextureClass::PbrOwned;
    }
    let (_, file_name) = split_parent(&path);
    if is_variant_map(file_stem(file_name)) {
        return TextureClass::VariantMap;
    }
    if is_excluded(&path) {
        return TextureClass::Excluded;
    }
    TextureClass::Regular(texture_key(&path))
}

/// Scanner for regular texture files.
#[derive(Debug, Clone, Default)]
pub struct RegularTextureScanner {
    config: ScanConfig,
}

impl RegularTextureScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan one mod folder. A mod without a `textures` folder yields an empty scan.
    pub fn scan(&self, mod_name: &str, mod_path: &Path) -> ModScan {
        let Some(textures_dir) = find_child_dir(mod_path, TEXTURES_FOLDER) else {
            return ModScan::default();
        };

        let mut index = TextureIndex::new();
        let mut log = Vec::new();
        let mut unique = BTreeSet::new();
        let mut processed = 0usize;
        let mut excluded = 0usize;

        let files = WalkDir::new(&textures_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dds"))
            });

        for entry in files {
            let Ok(relative) = entry.path().strip_prefix(&textures_dir) else {
                continue;
            };
            processed += 1;

            match classify_texture(&relative.to_string_lossy()) {
                TextureClass::Regular(identity) => {
                    index.insert(identity.clone(), mod_name);
                    unique.insert(identity);
                }
                TextureClass::NonAscii | TextureClass::Excluded => {
                    excluded += 1;
                    if excluded <= self.config.exclusion_sample_limit {
                        log.push(format!("Excluded texture in '{}': {}", mod_name, relative.display()));
                    }
                }
                TextureClass::PbrOwned | TextureClass::VariantMap => {}
            }
        }

        tracing::debug!(
            "{}: {} base textures from {} files ({} excluded)",
            mod_name,
            unique.len(),
            processed,
            excluded
        );

        if processed > 0 {
            log.push(format!(
                "'{}': Found {} unique base textures from {} files, excluded {} technical paths",
                mod_name,
                unique.len(),
                processed,
                excluded
            ));
        }

        ModScan { index, log }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"DDS ").unwrap();
    }

    #[test]
    fn classification_rules() {
        assert_eq!(classify_texture("Armor\\Steel\\Cuirass.dds"), TextureClass::Regular("armor/steel/cuirass.dds".into()));
        assert_eq!(classify_texture("armor/steel/cuirass_d.dds"), TextureClass::Regular("armor/steel/cuirass.dds".into()));
        assert_eq!(classify_texture("armor/steel/cuirass_n.dds"), TextureClass::VariantMap);
        assert_eq!(classify_texture("armor/steel/cuirass_M.dds"), TextureClass::VariantMap);
        assert_eq!(classify_texture("pbr/armor/steel/cuirass.dds"), TextureClass::PbrOwned);
        assert_eq!(classify_texture("armor/pbr/cuirass.dds"), TextureClass::PbrOwned);
        assert_eq!(classify_texture("landscape/dirt01.dds"), TextureClass::Excluded);
        assert_eq!(classify_texture("armor/ébène/plate.dds"), TextureClass::NonAscii);
    }

    #[test]
    fn missing_textures_folder_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let result = RegularTextureScanner::default().scan("RegModB", tmp.path());
        assert!(result.index.is_empty());
    }

    #[test]
    fn scan_groups_variants_and_skips_maps() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "textures/armor/iron/helmet.dds");
        touch(tmp.path(), "textures/armor/iron/helmet_d.dds");
        touch(tmp.path(), "textures/armor/iron/helmet_n.dds");
        touch(tmp.path(), "textures/armor/iron/helmet_rmaos.dds");
        touch(tmp.path(), "textures/pbr/armor/iron/helmet.dds");
        touch(tmp.path(), "textures/terrain/lod/tundra.dds");
        touch(tmp.path(), "textures/armor/iron/readme.txt");

        let result = RegularTextureScanner::default().scan("RegModB", tmp.path());
        assert_eq!(result.index.len(), 1);
        assert!(result.index.contains("armor/iron/helmet.dds"));
        assert!(result.log.iter().any(|l| l.contains("Found 1 unique base textures from 6 files")));
    }

    #[test]
    fn scan_matches_textures_folder_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "Textures/Clutter/Bucket01.DDS");
        let result = RegularTextureScanner::default().scan("RegModB", tmp.path());
        assert!(result.index.contains("clutter/bucket01.dds"));
    }
}
