//! On-disk rule record types and the directory loader.
//!
//! The rule database is a directory of JSON files, one per resource type,
//! plus a `categories.json` mapping coarse category names to type id lists:
//!
//! ```text
//! rules/
//!   categories.json      { "police_cars": [10, 19], "water_needed": [30], ... }
//!   0.json               { "object": 0, "pattern": { "base": ["fire truck", ...] } }
//!   5.json               { "object": 5, "pattern": { "base": ["ambulance"], ... } }
//!   ...
//! ```
//!
//! A base pattern is either plain text (indexed exactly after normalization)
//! or, when wrapped in slashes (`/…/`), a pattern expression evaluated as a
//! regex against the raw requirement text. `extend` entries are
//! quantity-conversion rules: the first one whose expression matches the
//! candidate description wins.

use crate::classifier::TypeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Name of the category-map file inside a rule directory.
const CATEGORY_FILE_STEM: &str = "categories";

/// One declarative rule file for a single canonical resource type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Canonical type id this record describes (the game's numeric id).
    #[serde(rename = "object")]
    pub id: TypeId,
    /// Text and pattern-expression rules attached to the type.
    #[serde(default)]
    pub pattern: PatternBlock,
    /// Opt out of the substring-fallback matching tier for this type.
    ///
    /// Exact, fuzzy, and pattern tiers still apply; the flag only prevents
    /// aggressive "one contains the other" matches for types whose names are
    /// short enough to collide with everything.
    #[serde(default)]
    pub matchless: bool,
}

/// Pattern rules for one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternBlock {
    /// Matchable names: plain text, or `/…/` for a regex pattern expression.
    #[serde(default)]
    pub base: Vec<String>,
    /// Quantity-conversion rules, tried in declaration order.
    #[serde(default)]
    pub extend: Vec<ExtendPattern>,
}

/// A quantity-conversion rule: when `pattern` matches the candidate
/// description (e.g. `"24 personnel"`), the displayed requirement count is
/// replaced with `quantity` actual instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendPattern {
    pub pattern: String,
    pub quantity: u32,
}

/// The full rule database, before compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    /// Per-type records, sorted by id.
    #[serde(default)]
    pub types: Vec<TypeRecord>,
    /// Category name -> member type ids.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<TypeId>>,
}

impl CatalogData {
    /// Build a catalog from in-memory records (no file access).
    ///
    /// Records are sorted by id so that rule declaration order does not
    /// depend on the order the caller assembled them in.
    pub fn from_records(
        mut types: Vec<TypeRecord>,
        categories: BTreeMap<String, Vec<TypeId>>,
    ) -> Self {
        types.sort_by_key(|r| r.id);
        CatalogData { types, categories }
    }
}

/// Errors from the rule-directory loader.
///
/// Per-file problems are logged and skipped; these variants cover failures
/// of the load as a whole.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read rule directory {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no usable rule files in {0}")]
    Empty(PathBuf),
}

/// Load every `*.json` rule file under `dir` into a [`CatalogData`].
///
/// Unreadable or unparsable files are skipped with a warning. The load fails
/// only when the directory itself cannot be read or no file yielded any
/// rules at all.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<CatalogData, CatalogError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    // Directory iteration order is platform-defined.
    paths.sort();

    let mut types = Vec::new();
    let mut categories = BTreeMap::new();

    for path in &paths {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!("skipping unreadable rule file {}: {err}", path.display());
                continue;
            }
        };

        if path.file_stem().is_some_and(|s| s == CATEGORY_FILE_STEM) {
            match serde_json::from_str::<BTreeMap<String, Vec<TypeId>>>(&text) {
                Ok(map) => categories.extend(map),
                Err(err) => warn!("skipping malformed category file {}: {err}", path.display()),
            }
            continue;
        }

        match serde_json::from_str::<TypeRecord>(&text) {
            Ok(record) => types.push(record),
            Err(err) => warn!("skipping malformed rule file {}: {err}", path.display()),
        }
    }

    if types.is_empty() && categories.is_empty() {
        return Err(CatalogError::Empty(dir.to_path_buf()));
    }

    Ok(CatalogData::from_records(types, categories))
}
