//! Texture identity to mod-name index.
//!
//! Backs both the PBR coverage map and the regular texture map. Keys are
//! lower-cased base texture identities; values are the set of mods that
//! provide (or ship) a texture at that identity.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from base texture identity to a set of mod names.
///
/// Grows only: scans insert and merge, nothing removes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextureIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

/// Base texture identity -> mods providing PBR coverage for it.
pub type PbrCoverageMap = TextureIndex;

/// Base texture identity -> mods shipping a regular texture at it.
pub type RegularTextureMap = TextureIndex;

impl TextureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `mod_name` under `identity`. Returns false if it was already present.
    pub fn insert(&mut self, identity: impl Into<String>, mod_name: impl Into<String>) -> bool {
        self.entries
            .entry(identity.into())
            .or_default()
            .insert(mod_name.into())
    }

    /// Union another index into this one.
    pub fn merge(&mut self, other: TextureIndex) {
        for (identity, mods) in other.entries {
            self.entries.entry(identity).or_default().extend(mods);
        }
    }

    pub fn get(&self, identity: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    /// Number of unique base texture identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total (identity, mod) associations.
    pub fn associations(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    /// Number of identities a given mod appears under.
    pub fn count_for_mod(&self, mod_name: &str) -> usize {
        self.entries.values().filter(|mods| mods.contains(mod_name)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, M, I> FromIterator<(K, I)> for TextureIndex
where
    K: Into<String>,
    M: Into<String>,
    I: IntoIterator<Item = M>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut index = TextureIndex::new();
        for (identity, mods) in iter {
            let identity = identity.into();
            for mod_name in mods {
                index.insert(identity.clone(), mod_name);
            }
        }
        index
    }
}

/// Result of scanning one mod: its delta index plus human-readable log lines.
#[derive(Debug, Clone, Default)]
pub struct ModScan {
    pub index: TextureIndex,
    pub log: Vec<String>,
}
