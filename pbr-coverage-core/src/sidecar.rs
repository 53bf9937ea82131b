//! PBR patcher sidecar JSON descriptors.
//!
//! A sidecar is either a bare array of entry objects, an object with an
//! optional `default` object and an `entries` array, or a single entry
//! object. The layout is resolved once at parse time; consumers only see
//! merged [`SidecarEntry`] values.

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Top-level JSON as written on disk.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSidecar {
    List(Vec<Value>),
    Object(Map<String, Value>),
}

/// Resolved sidecar layout.
#[derive(Debug, Clone, PartialEq)]
pub enum SidecarLayout {
    /// `[ {...}, {...} ]`
    Array(Vec<Value>),
    /// `{ "default": {...}, "entries": [...] }`
    Entries {
        defaults: Map<String, Value>,
        entries: Vec<Value>,
    },
    /// Any other object: the object itself is the only entry.
    Single {
        defaults: Map<String, Value>,
        entry: Map<String, Value>,
    },
}

/// One entry after defaults were merged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidecarEntry {
    /// `match_diffuse`, falling back to `texture`.
    pub texture: Option<String>,
    /// `slot<N>` fields in key order, as (key, value).
    pub slots: Vec<(String, String)>,
}

impl SidecarLayout {
    /// Parse sidecar bytes, tolerating a UTF-8 byte-order mark.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let raw: RawSidecar = serde_json::from_slice(bytes)?;
        Ok(Self::from_raw(raw))
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }

    fn from_raw(raw: RawSidecar) -> Self {
        match raw {
            RawSidecar::List(entries) => SidecarLayout::Array(entries),
            RawSidecar::Object(mut object) => {
                let defaults = match object.get("default") {
                    Some(Value::Object(d)) => d.clone(),
                    _ => Map::new(),
                };
                match object.remove("entries") {
                    Some(Value::Array(entries)) => SidecarLayout::Entries { defaults, entries },
                    Some(other) => {
                        // Non-array `entries` is kept on the entry itself.
                        object.insert("entries".to_string(), other);
                        SidecarLayout::Single { defaults, entry: object }
                    }
                    None => SidecarLayout::Single { defaults, entry: object },
                }
            }
        }
    }

    /// Merge defaults into every entry (entry values win) and extract the
    /// texture references. Non-object entries are skipped.
    pub fn entries(&self) -> Vec<SidecarEntry> {
        let empty = Map::new();
        let (defaults, raw): (&Map<String, Value>, Vec<&Map<String, Value>>) = match self {
            SidecarLayout::Array(list) => (&empty, list.iter().filter_map(Value::as_object).collect()),
            SidecarLayout::Entries { defaults, entries } => {
                (defaults, entries.iter().filter_map(Value::as_object).collect())
            }
            SidecarLayout::Single { defaults, entry } => (defaults, vec![entry]),
        };

        raw.into_iter()
            .map(|entry| {
                let mut merged = defaults.clone();
                merged.extend(entry.iter().map(|(k, v)| (k.clone(), v.clone())));
                SidecarEntry::from_object(&merged)
            })
            .collect()
    }
}

impl SidecarEntry {
    fn from_object(object: &Map<String, Value>) -> Self {
        let texture = ["match_diffuse", "texture"]
            .iter()
            .find_map(|key| object.get(*key).and_then(non_empty_str))
            .map(str::to_string);

        let slots = object
            .iter()
            .filter(|(key, _)| is_slot_key(key))
            .filter_map(|(key, value)| non_empty_str(value).map(|v| (key.clone(), v.to_string())))
            .collect();

        SidecarEntry { texture, slots }
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// `slot` followed by one or more ASCII digits.
pub fn is_slot_key(key: &str) -> bool {
    key.strip_prefix("slot")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Strip a leading `textures/` or `textures\` (any case) from a slot value.
pub fn strip_textures_prefix(value: &str) -> &str {
    const PREFIX_LEN: usize = "textures/".len();
    match value.get(..PREFIX_LEN) {
        Some(head)
            if head.eq_ignore_ascii_case("textures/") || head.eq_ignore_ascii_case("textures\\") =>
        {
            &value[PREFIX_LEN..]
        }
        _ => value,
    }
}

impl From<SidecarLayout> for Vec<SidecarEntry> {
    fn from(layout: SidecarLayout) -> Self {
        layout.entries()
    }
}

/// Parse sidecar bytes straight into merged entries.
///
/// Well-formed JSON that is neither an array nor an object is reported as
/// [`Error::Sidecar`].
pub fn parse_sidecar(bytes: &[u8]) -> Result<Vec<SidecarEntry>> {
    SidecarLayout::from_slice(bytes)
        .map(Vec::from)
        .map_err(|e| match e {
            Error::Json(json) if json.is_data() => {
                Error::Sidecar("expected an array or object at top level".to_string())
            }
            other => other,
        })
}
