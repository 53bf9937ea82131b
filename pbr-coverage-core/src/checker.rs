//! Scan + analyze orchestration.
//!
//! Each mod is scanned independently into a delta; deltas are merged in
//! mod-list order, so parallel and sequential runs produce the same result.

use crate::config::ScanConfig;
use crate::coverage::{CoverageAnalysis, CoverageAnalyzer};
use crate::index::{ModScan, PbrCoverageMap, RegularTextureMap};
use crate::modlist::ModEntry;
use crate::pbr_scanner::PbrCoverageScanner;
use crate::texture_scanner::RegularTextureScanner;
use rayon::prelude::*;

/// Mods listed by name in the run header before collapsing to a count.
const LISTED_MODS: usize = 10;

/// Everything one checker run produced.
#[derive(Debug, Clone, Default)]
pub struct CoverageRun {
    /// Number of enabled mods scanned
    pub mods_scanned: usize,
    pub coverage_map: PbrCoverageMap,
    pub regular_map: RegularTextureMap,
    pub analysis: CoverageAnalysis,
    /// Scan log, in mod-list order
    pub debug_log: Vec<String>,
}

/// Both scans of one mod.
struct ModDelta {
    pbr: ModScan,
    regular: ModScan,
}

pub struct CoverageChecker {
    config: ScanConfig,
    pbr_scanner: PbrCoverageScanner,
    texture_scanner: RegularTextureScanner,
}

impl CoverageChecker {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            pbr_scanner: PbrCoverageScanner::new(config.clone()),
            texture_scanner: RegularTextureScanner::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn scan_mod(&self, entry: &ModEntry) -> ModDelta {
        ModDelta {
            pbr: self.pbr_scanner.scan(&entry.name, &entry.path),
            regular: self.texture_scanner.scan(&entry.name, &entry.path),
        }
    }

    /// Scan every enabled mod and analyze coverage.
    pub fn run(&self, mods: &[ModEntry]) -> CoverageRun {
        let mut debug_log = Vec::new();
        debug_log.push(format!("Processing {} enabled mods:", mods.len()));
        for entry in mods.iter().take(LISTED_MODS) {
            debug_log.push(format!("  - {}", entry.name));
        }
        if mods.len() > LISTED_MODS {
            debug_log.push(format!("  ... and {} more", mods.len() - LISTED_MODS));
        }

        let deltas: Vec<ModDelta> = if self.config.parallel {
            mods.par_iter().map(|entry| self.scan_mod(entry)).collect()
        } else {
            mods.iter().map(|entry| self.scan_mod(entry)).collect()
        };

        let mut coverage_map = PbrCoverageMap::new();
        let mut regular_map = RegularTextureMap::new();
        for delta in deltas {
            debug_log.extend(delta.pbr.log);
            debug_log.extend(delta.regular.log);
            coverage_map.merge(delta.pbr.index);
            regular_map.merge(delta.regular.index);
        }

        let analysis = CoverageAnalyzer::analyze(&coverage_map, &regular_map);

        tracing::info!(
            "Scanned {} mods: {} PBR-covered base textures, {} regular base textures",
            mods.len(),
            coverage_map.len(),
            regular_map.len()
        );

        CoverageRun {
            mods_scanned: mods.len(),
            coverage_map,
            regular_map,
            analysis,
            debug_log,
        }
    }
}

impl Default for CoverageChecker {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Two PBR mods and two regular texture mods with overlapping textures.
    fn mod_tree() -> (tempfile::TempDir, Vec<ModEntry>) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();

        write(root, "PBR Steel/PBRNifPatcher/armor/steel/steel.json", r#"[{"texture": "cuirass"}]"#);
        write(root, "PBR Steel/textures/pbr/armor/steel/cuirass.dds", "");
        write(
            root,
            "PBR Steel Alt/PBRNifPatcher/armor/steel/alt.json",
            r#"{"entries": [{"texture": "cuirass"}, {"texture": "helmet"}]}"#,
        );
        write(root, "Retexture A/textures/armor/steel/cuirass.dds", "");
        write(root, "Retexture A/textures/armor/steel/cuirass_n.dds", "");
        write(root, "Retexture A/textures/armor/steel/helmet_02.dds", "");
        write(root, "Retexture B/textures/armor/iron/gauntlets.dds", "");
        write(root, "Retexture B/textures/armor/steel/cuirass_d.dds", "");

        let mods = ["PBR Steel", "PBR Steel Alt", "Retexture A", "Retexture B"]
            .iter()
            .map(|name| ModEntry::new(*name, root.join(name)))
            .collect();
        (tmp, mods)
    }

    #[test]
    fn end_to_end_classification() {
        let (_tmp, mods) = mod_tree();
        let run = CoverageChecker::default().run(&mods);

        assert_eq!(run.mods_scanned, 4);
        assert_eq!(run.coverage_map.len(), 2);
        assert_eq!(run.regular_map.len(), 3);

        let a = &run.analysis;
        assert_eq!(
            a.covered.get("Retexture A").unwrap(),
            &vec!["armor/steel/cuirass.dds".to_string(), "armor/steel/helmet_02.dds".to_string()]
        );
        assert_eq!(
            a.providers.get("Retexture A").unwrap().iter().collect::<Vec<_>>(),
            vec!["PBR Steel", "PBR Steel Alt"]
        );
        assert_eq!(a.covered_count("Retexture B"), 1);
        assert_eq!(
            a.uncovered.get("Retexture B").unwrap(),
            &vec!["armor/iron/gauntlets.dds".to_string()]
        );
        assert!(!a.uncovered.contains_key("Retexture A"));
    }

    #[test]
    fn parallel_matches_sequential() {
        let (_tmp, mods) = mod_tree();
        let parallel = CoverageChecker::new(ScanConfig::default()).run(&mods);
        let sequential = CoverageChecker::new(ScanConfig::default().sequential()).run(&mods);

        assert_eq!(parallel.coverage_map, sequential.coverage_map);
        assert_eq!(parallel.regular_map, sequential.regular_map);
        assert_eq!(parallel.analysis, sequential.analysis);
        assert_eq!(parallel.debug_log, sequential.debug_log);
    }

    #[test]
    fn mod_order_does_not_change_analysis() {
        let (_tmp, mut mods) = mod_tree();
        let forward = CoverageChecker::default().run(&mods);
        mods.reverse();
        let backward = CoverageChecker::default().run(&mods);
        assert_eq!(forward.analysis, backward.analysis);
    }

    #[test]
    fn empty_mod_list() {
        let run = CoverageChecker::default().run(&[]);
        assert!(run.coverage_map.is_empty());
        assert!(run.analysis.covered.is_empty());
        assert_eq!(run.debug_log, vec!["Processing 0 enabled mods:".to_string()]);
    }
}
