//! Coverage report generation.
//!
//! Turns a [`CoverageRun`] into per-mod coverage summaries, suitable for CLI
//! text output or JSON export.

use crate::checker::CoverageRun;
use chrono::Utc;
use serde::Serialize;

/// Uncovered textures listed per partially covered mod in the text report.
const TEXT_SAMPLE_LIMIT: usize = 8;

/// Coverage classification of a regular-texture mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    /// Every base texture has PBR coverage
    Covered,
    Partial,
    /// No base texture has PBR coverage
    Uncovered,
}

/// Coverage summary for one mod
#[derive(Debug, Clone, Serialize)]
pub struct ModCoverage {
    pub mod_name: String,
    pub total_textures: usize,
    pub covered_count: usize,
    pub uncovered_count: usize,
    pub coverage_percent: f64,
    pub status: CoverageStatus,
    /// In the bottom 20% of partially and un-covered mods
    pub minimal: bool,
    pub providers: Vec<String>,
    pub uncovered_textures: Vec<String>,
}

/// Run-wide statistics
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub mods_scanned: usize,
    pub pbr_covered_textures: usize,
    pub regular_textures: usize,
    pub mod_texture_associations: usize,
    pub numbered_variant_matches: usize,
    pub fully_covered_mods: usize,
    pub partially_covered_mods: usize,
    pub uncovered_mods: usize,
}

/// Complete coverage report for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub generated_at: String,
    pub summary: ReportSummary,
    /// Fully covered mods by name, then the rest by coverage (highest first)
    pub mods: Vec<ModCoverage>,
}

impl ModCoverage {
    fn from_run(run: &CoverageRun, mod_name: &str) -> Self {
        let analysis = &run.analysis;
        let covered_count = analysis.covered_count(mod_name);
        let uncovered_count = analysis.uncovered_count(mod_name);
        let total_textures = run.regular_map.count_for_mod(mod_name);
        let coverage_percent = if total_textures > 0 {
            covered_count as f64 / total_textures as f64 * 100.0
        } else {
            0.0
        };
        let status = if uncovered_count == 0 && covered_count > 0 {
            CoverageStatus::Covered
        } else if covered_count == 0 {
            CoverageStatus::Uncovered
        } else {
            CoverageStatus::Partial
        };

        ModCoverage {
            mod_name: mod_name.to_string(),
            total_textures,
            covered_count,
            uncovered_count,
            coverage_percent,
            status,
            minimal: false,
            providers: analysis
                .providers
                .get(mod_name)
                .map(|p| p.iter().cloned().collect())
                .unwrap_or_default(),
            uncovered_textures: analysis.uncovered.get(mod_name).cloned().unwrap_or_default(),
        }
    }
}

impl CoverageReport {
    pub fn from_run(run: &CoverageRun) -> Self {
        let mut fully: Vec<ModCoverage> = Vec::new();
        let mut rest: Vec<ModCoverage> = Vec::new();
        for mod_name in run.analysis.mod_names() {
            let coverage = ModCoverage::from_run(run, mod_name);
            if coverage.status == CoverageStatus::Covered {
                fully.push(coverage);
            } else {
                rest.push(coverage);
            }
        }

        rest.sort_by(|a, b| {
            b.coverage_percent
                .total_cmp(&a.coverage_percent)
                .then_with(|| a.mod_name.cmp(&b.mod_name))
        });
        let minimal_count = if rest.is_empty() { 0 } else { (rest.len() / 5).max(1) };
        let first_minimal = rest.len() - minimal_count;
        for coverage in &mut rest[first_minimal..] {
            coverage.minimal = true;
        }

        let count = |status: CoverageStatus| {
            fully
                .iter()
                .chain(rest.iter())
                .filter(|m| m.status == status)
                .count()
        };
        let summary = ReportSummary {
            mods_scanned: run.mods_scanned,
            pbr_covered_textures: run.coverage_map.len(),
            regular_textures: run.regular_map.len(),
            mod_texture_associations: run.regular_map.associations(),
            numbered_variant_matches: run.analysis.numbered_variant_matches,
            fully_covered_mods: count(CoverageStatus::Covered),
            partially_covered_mods: count(CoverageStatus::Partial),
            uncovered_mods: count(CoverageStatus::Uncovered),
        };

        fully.extend(rest);
        CoverageReport {
            generated_at: Utc::now().to_rfc3339(),
            summary,
            mods: fully,
        }
    }

    pub fn get(&self, mod_name: &str) -> Option<&ModCoverage> {
        self.mods.iter().find(|m| m.mod_name == mod_name)
    }

    /// Serialize to formatted JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Human-readable report: fully covered, partial detail, then minimal coverage.
    pub fn to_text(&self) -> String {
        let s = &self.summary;
        let mut out = format!(
            "Scanned {} enabled mods.\nFound {} PBR covered base textures and {} mod-texture combinations across {} unique base textures.\n",
            s.mods_scanned, s.pbr_covered_textures, s.mod_texture_associations, s.regular_textures
        );

        let fully: Vec<&ModCoverage> = self
            .mods
            .iter()
            .filter(|m| m.status == CoverageStatus::Covered)
            .collect();
        let detailed: Vec<&ModCoverage> = self
            .mods
            .iter()
            .filter(|m| m.status != CoverageStatus::Covered && !m.minimal)
            .collect();
        let minimal: Vec<&ModCoverage> = self.mods.iter().filter(|m| m.minimal).collect();

        if !fully.is_empty() {
            out.push_str("\n✓ Fully covered by PBR\n");
            out.push_str("------------------------------------\n");
            for m in &fully {
                out.push_str(&format!("  {}{}\n", m.mod_name, provider_list(&m.providers)));
            }
        }

        if !detailed.is_empty() {
            out.push_str("\nPartial PBR coverage:\n");
            out.push_str("------------------------------------\n");
            for m in &detailed {
                out.push_str(&format!("\n{}\n", m.mod_name));
                out.push_str(&format!(
                    "  PBR Coverage: {:.1}% ({}/{} base textures)\n",
                    m.coverage_percent, m.covered_count, m.total_textures
                ));
                if !m.providers.is_empty() {
                    out.push_str(&format!("  PBR provided by: {}\n", m.providers.join(", ")));
                }
                out.push_str("  Missing PBR coverage for base textures:\n");
                for texture in m.uncovered_textures.iter().take(TEXT_SAMPLE_LIMIT) {
                    out.push_str(&format!("    - {}\n", texture));
                }
                if m.uncovered_textures.len() > TEXT_SAMPLE_LIMIT {
                    out.push_str(&format!(
                        "    ... and {} more\n",
                        m.uncovered_textures.len() - TEXT_SAMPLE_LIMIT
                    ));
                }
            }
        }

        if !minimal.is_empty() {
            out.push_str("\n❌ Minimal PBR coverage (bottom 20%):\n");
            out.push_str("------------------------------------\n");
            for m in &minimal {
                out.push_str(&format!(
                    "  {} ({:.1}%){}\n",
                    m.mod_name,
                    m.coverage_percent,
                    provider_list(&m.providers)
                ));
            }
        }

        out
    }
}

fn provider_list(providers: &[String]) -> String {
    if providers.is_empty() {
        String::new()
    } else {
        format!(" [{}]", providers.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageAnalyzer;
    use crate::index::TextureIndex;

    fn run_from(coverage: &[(&str, &[&str])], regular: &[(&str, &[&str])], mods: usize) -> CoverageRun {
        let coverage_map: TextureIndex = coverage.iter().map(|(k, v)| (*k, v.iter().copied())).collect();
        let regular_map: TextureIndex = regular.iter().map(|(k, v)| (*k, v.iter().copied())).collect();
        let analysis = CoverageAnalyzer::analyze(&coverage_map, &regular_map);
        CoverageRun {
            mods_scanned: mods,
            coverage_map,
            regular_map,
            analysis,
            debug_log: Vec::new(),
        }
    }

    fn sample_run() -> CoverageRun {
        run_from(
            &[("a/1.dds", &["PBR1"]), ("a/2.dds", &["PBR2"]), ("b/1.dds", &["PBR1"])],
            &[
                ("a/1.dds", &["Full", "Half"]),
                ("a/2.dds", &["Full"]),
                ("a/3.dds", &["Half"]),
                ("c/1.dds", &["None"]),
            ],
            4,
        )
    }

    #[test]
    fn classifies_mods() {
        let report = CoverageReport::from_run(&sample_run());

        let full = report.get("Full").unwrap();
        assert_eq!(full.status, CoverageStatus::Covered);
        assert_eq!(full.providers, vec!["PBR1", "PBR2"]);
        assert_eq!(full.coverage_percent, 100.0);

        let half = report.get("Half").unwrap();
        assert_eq!(half.status, CoverageStatus::Partial);
        assert_eq!(half.total_textures, 2);
        assert_eq!(half.coverage_percent, 50.0);
        assert_eq!(half.uncovered_textures, vec!["a/3.dds"]);
        assert!(!half.minimal);

        let none = report.get("None").unwrap();
        assert_eq!(none.status, CoverageStatus::Uncovered);
        assert!(none.minimal);

        assert_eq!(report.mods[0].mod_name, "Full");
        assert_eq!(report.summary.fully_covered_mods, 1);
        assert_eq!(report.summary.partially_covered_mods, 1);
        assert_eq!(report.summary.uncovered_mods, 1);
        assert_eq!(report.summary.pbr_covered_textures, 3);
        assert_eq!(report.summary.regular_textures, 4);
        assert_eq!(report.summary.mod_texture_associations, 5);
    }

    #[test]
    fn text_report_sections() {
        let text = CoverageReport::from_run(&sample_run()).to_text();
        assert!(text.contains("Scanned 4 enabled mods."));
        assert!(text.contains("  Full [PBR1, PBR2]"));
        assert!(text.contains("PBR Coverage: 50.0% (1/2 base textures)"));
        assert!(text.contains("    - a/3.dds"));
        assert!(text.contains("  None (0.0%)"));
    }

    #[test]
    fn single_partial_mod_is_minimal() {
        let regular: Vec<(String, Vec<&str>)> = (0..12)
            .map(|i| (format!("x/{:02}.dds", i), vec!["Big"]))
            .chain(std::iter::once(("y/covered.dds".to_string(), vec!["Big"])))
            .collect();
        let regular_map: TextureIndex = regular.into_iter().collect();
        let coverage_map: TextureIndex = [("y/covered.dds", ["PBR"])].into_iter().collect();
        let analysis = CoverageAnalyzer::analyze(&coverage_map, &regular_map);
        let run = CoverageRun {
            mods_scanned: 2,
            coverage_map,
            regular_map,
            analysis,
            debug_log: Vec::new(),
        };
        let report = CoverageReport::from_run(&run);
        assert!(report.get("Big").unwrap().minimal);
        assert!(report.to_text().contains("  Big (7.7%) [PBR]"));
    }

    #[test]
    fn report_serializes_to_json() {
        let json = CoverageReport::from_run(&sample_run()).to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("generated_at").is_some());
        assert_eq!(parsed["summary"]["mods_scanned"], 4);
        assert_eq!(parsed["mods"][0]["status"], "covered");
        assert!(parsed["mods"].as_array().unwrap().iter().any(|m| m["status"] == "uncovered"));
    }
}
