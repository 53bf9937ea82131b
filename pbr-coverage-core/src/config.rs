//! Scan configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options shared by the scanners and the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Scan mods concurrently on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Accepted coverage entries logged per mod before going quiet
    #[serde(default = "default_coverage_sample_limit")]
    pub coverage_sample_limit: usize,
    /// Excluded paths logged per mod before going quiet
    #[serde(default = "default_exclusion_sample_limit")]
    pub exclusion_sample_limit: usize,
}

fn default_parallel() -> bool {
    true
}

fn default_coverage_sample_limit() -> usize {
    5
}

fn default_exclusion_sample_limit() -> usize {
    3
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            coverage_sample_limit: default_coverage_sample_limit(),
            exclusion_sample_limit: default_exclusion_sample_limit(),
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(s: &str) -> crate::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        assert_eq!(ScanConfig::from_toml_str("").unwrap(), ScanConfig::default());
    }

    #[test]
    fn overrides_fields() {
        let config = ScanConfig::from_toml_str("parallel = false\ncoverage_sample_limit = 10").unwrap();
        assert!(!config.parallel);
        assert_eq!(config.coverage_sample_limit, 10);
        assert_eq!(config.exclusion_sample_limit, 3);
    }

    #[test]
    fn rejects_bad_types() {
        assert!(ScanConfig::from_toml_str("parallel = \"yes\"").is_err());
    }
}
