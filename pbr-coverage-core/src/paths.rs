//! Texture path normalization.
//!
//! Reduces texture file paths to a "base texture identity": a forward-slash
//! relative path whose file stem has its material-role suffix removed, so that
//! `cuirass_n.dds`, `cuirass_m.dds` and `cuirass.dds` all group together.

/// Known PBR / variant-map role suffixes, tested in order.
///
/// First match wins, so a suffix must come before any shorter suffix it ends
/// with (`_envmask` before `mask`, `_rmaos` before `_s`).
pub const TEXTURE_SUFFIXES: &[&str] = &[
    "_envmask",
    "_normalmap",
    "_envmap",
    "_rmaos",
    "_flow",
    "_spec",
    "_emit",
    "_cnr",
    "_msn",
    "_em",
    "_bl",
    "_sk",
    "_nm",
    "_b",
    "_d",
    "_e",
    "_f",
    "_g",
    "_i",
    "_m",
    "_n",
    "_p",
    "_s",
    "mask",
];

/// Single-role map suffixes that never denote a base (diffuse) texture:
/// normal, mask, subsurface, glow, parallax, environment.
pub const VARIANT_SUFFIXES: &[&str] = &["_n", "_m", "_s", "_g", "_p", "_e"];

/// Path fragments the downstream patcher never touches.
pub const EXCLUDED_PATTERNS: &[&str] = &[
    "cameras",
    "dyndolod",
    "lod",
    "markers",
    "facetint",
    "skintint",
    "landscape",
    "grass",
    "meta.ini",
    "cc",
    "_resourcepack",
];

const TEXTURE_EXTENSION: &str = ".dds";

/// Normalize separators: backslashes become `/`, empty segments are dropped.
///
/// `"\\armor//steel\\cuirass"` becomes `"armor/steel/cuirass"`.
pub fn normalize_path(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a normalized path into (directory, file name). Directory is empty at root.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// File name without its last extension. Leading-dot names keep the dot.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Join a directory and file name; an empty directory means root.
pub fn join_dir(dir: &str, file_name: &str) -> String {
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", dir, file_name)
    }
}

/// Strip the first matching role suffix from a file stem.
///
/// Only one suffix is removed. A stem that consists solely of a suffix is
/// left as-is.
pub fn strip_role_suffix(stem: &str) -> &str {
    TEXTURE_SUFFIXES
        .iter()
        .find(|suffix| stem.len() > suffix.len() && stem.ends_with(*suffix))
        .map(|suffix| &stem[..stem.len() - suffix.len()])
        .unwrap_or(stem)
}

/// Base texture identity of a path, case preserved.
///
/// `"armor/steel/cuirass_m.dds"` becomes `"armor/steel/cuirass.dds"`.
/// Callers comparing identities should go through [`texture_key`], which
/// applies the lower-casing used for every map key.
pub fn base_texture_identity(path: &str) -> String {
    let normalized = normalize_path(path);
    let (dir, file_name) = split_parent(&normalized);
    let base_stem = strip_role_suffix(file_stem(file_name));
    join_dir(dir, &format!("{}{}", base_stem, TEXTURE_EXTENSION))
}

/// Lower-cased base texture identity; the join key for all coverage maps.
pub fn texture_key(path: &str) -> String {
    base_texture_identity(path).to_lowercase()
}

/// Append `.dds` unless the path already carries it.
pub fn with_texture_extension(path: &str) -> String {
    if path.to_ascii_lowercase().ends_with(TEXTURE_EXTENSION) {
        path.to_string()
    } else {
        format!("{}{}", path, TEXTURE_EXTENSION)
    }
}

/// Whether the path falls in a zone the patcher skips (case-insensitive substring).
pub fn is_excluded(path: &str) -> bool {
    let lower = path.to_lowercase();
    EXCLUDED_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Whether a (lower-cased) stem ends in a single-role variant suffix.
pub fn is_variant_map(stem: &str) -> bool {
    VARIANT_SUFFIXES.iter().any(|suffix| stem.ends_with(suffix))
}

/// Whether a normalized, lower-cased path lives under a `pbr/` segment.
pub fn is_pbr_owned(path: &str) -> bool {
    path.starts_with("pbr/") || path.contains("/pbr/")
}
