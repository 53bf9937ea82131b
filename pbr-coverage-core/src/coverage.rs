//! Coverage analysis.
//!
//! Joins the PBR coverage map against the regular texture map and sorts every
//! regular texture of every mod into covered or uncovered.

use crate::index::TextureIndex;
use crate::paths::{file_stem, join_dir, split_parent};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Numbered-variant suffixes that fall back to the un-numbered base texture.
pub const NUMBERED_VARIANTS: &[&str] = &["_01", "_02", "_03", "_04", "_05"];

/// How a regular texture identity found its PBR coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Direct,
    NumberedVariant,
}

/// Result of one analysis run. Lists are sorted; provider sets have no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageAnalysis {
    /// mod name -> covered base texture identities
    pub covered: BTreeMap<String, Vec<String>>,
    /// mod name -> uncovered base texture identities
    pub uncovered: BTreeMap<String, Vec<String>>,
    /// mod name -> PBR mods providing its coverage
    pub providers: BTreeMap<String, BTreeSet<String>>,
    /// Identities matched only through the numbered-variant fallback
    pub numbered_variant_matches: usize,
}

impl CoverageAnalysis {
    /// Every mod that owns at least one regular texture.
    pub fn mod_names(&self) -> BTreeSet<&str> {
        self.covered
            .keys()
            .chain(self.uncovered.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn covered_count(&self, mod_name: &str) -> usize {
        self.covered.get(mod_name).map_or(0, Vec::len)
    }

    pub fn uncovered_count(&self, mod_name: &str) -> usize {
        self.uncovered.get(mod_name).map_or(0, Vec::len)
    }
}

/// The `_0N`-stripped fallback identity, if `identity` is a numbered variant.
pub fn numbered_variant_base(identity: &str) -> Option<String> {
    let (dir, file_name) = split_parent(identity);
    let stem = file_stem(file_name);
    NUMBERED_VARIANTS
        .iter()
        .find(|suffix| stem.ends_with(*suffix))
        .map(|suffix| join_dir(dir, &format!("{}.dds", &stem[..stem.len() - suffix.len()])))
}

/// Find the PBR providers for one regular identity.
pub fn lookup_providers<'a>(
    coverage: &'a TextureIndex,
    identity: &str,
) -> Option<(MatchKind, &'a BTreeSet<String>)> {
    if let Some(mods) = coverage.get(identity) {
        return Some((MatchKind::Direct, mods));
    }
    let fallback = numbered_variant_base(identity)?;
    coverage
        .get(&fallback)
        .map(|mods| (MatchKind::NumberedVariant, mods))
}

/// Stateless coverage join.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageAnalyzer;

impl CoverageAnalyzer {
    /// Analyze a full regular texture map against the coverage map.
    pub fn analyze(coverage: &TextureIndex, regular: &TextureIndex) -> CoverageAnalysis {
        Self::analyze_entries(coverage, regular.iter())
    }

    /// Analyze regular entries in any order. The result does not depend on
    /// iteration order.
    pub fn analyze_entries<'a, I>(coverage: &TextureIndex, regular: I) -> CoverageAnalysis
    where
        I: IntoIterator<Item = (&'a str, &'a BTreeSet<String>)>,
    {
        let mut analysis = CoverageAnalysis::default();

        for (identity, mod_names) in regular {
            let found = lookup_providers(coverage, identity);
            match found {
                Some((kind, providers)) => {
                    tracing::trace!("{} -> {:?} match by {:?}", identity, kind, providers);
                    if kind == MatchKind::NumberedVariant {
                        analysis.numbered_variant_matches += 1;
                    }
                    for mod_name in mod_names {
                        analysis
                            .covered
                            .entry(mod_name.clone())
                            .or_default()
                            .push(identity.to_string());
                        analysis
                            .providers
                            .entry(mod_name.clone())
                            .or_default()
                            .extend(providers.iter().cloned());
                    }
                }
                None => {
                    tracing::trace!("{} -> no match", identity);
                    for mod_name in mod_names {
                        analysis
                            .uncovered
                            .entry(mod_name.clone())
                            .or_default()
                            .push(identity.to_string());
                    }
                }
            }
        }

        for list in analysis.covered.values_mut().chain(analysis.uncovered.values_mut()) {
            list.sort();
            list.dedup();
        }
        analysis
    }
}
