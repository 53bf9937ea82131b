//! # PBR Coverage Core
//!
//! Engine for finding texture mods made redundant by PBR replacers.
//! Designed for use by CLI tools and mod-manager front ends.
//!
//! ## Architecture
//!
//! - [`paths`] - Path normalization and base texture identities
//! - [`sidecar`] - PBR patcher sidecar JSON layouts
//! - [`pbr_scanner`] - PBR coverage claims per mod
//! - [`texture_scanner`] - Regular textures per mod
//! - [`coverage`] - Joining coverage against regular textures
//! - [`checker`] - Scan + analyze orchestration
//! - [`report`] - Per-mod coverage summaries, text and JSON

pub mod checker;
pub mod config;
pub mod coverage;
pub mod index;
pub mod modlist;
pub mod paths;
pub mod pbr_scanner;
pub mod report;
pub mod sidecar;
pub mod texture_scanner;

// Re-export main types for convenient access
pub use checker::{CoverageChecker, CoverageRun};
pub use config::ScanConfig;
pub use coverage::{CoverageAnalysis, CoverageAnalyzer, MatchKind};
pub use index::{ModScan, PbrCoverageMap, RegularTextureMap, TextureIndex};
pub use modlist::{load_mods_dir, load_modlist, ModEntry};
pub use paths::{base_texture_identity, normalize_path, texture_key};
pub use pbr_scanner::PbrCoverageScanner;
pub use report::{CoverageReport, CoverageStatus, ModCoverage, ReportSummary};
pub use sidecar::{SidecarEntry, SidecarLayout};
pub use texture_scanner::RegularTextureScanner;

/// Common result type for coverage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Library-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Unsupported sidecar: {0}")]
    Sidecar(String),

    #[error("{0}")]
    Other(String),
}
