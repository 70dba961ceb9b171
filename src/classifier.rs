//! Tiered requirement-name resolution.
//!
//! A mission page states its needs as free text ("2 Platform Trucks",
//! "Police Car", "SWAT Armoured Vehicle"). The classifier maps such text to
//! the game's canonical type ids, using four matching tiers in strict
//! precedence order — the first tier that produces a *non-empty* result set
//! wins, and later tiers never contribute once an earlier tier matched
//! anything:
//!
//! ```text
//! (1) exact      normalized text hits the index directly
//! (2) fuzzy      normalized text +"s" / -"s" hits the index
//! (3) pattern    registered pattern expressions match the raw text
//! (4) substring  an index key contains the text, or vice versa
//!                (types flagged `matchless` are excluded here only)
//! ```
//!
//! Unmatched input is not an error: it yields an empty set and the caller
//! skips that requirement line.
//!
//! The classifier also answers two side questions resolved from the same
//! rule database: which capability tags a type carries, and how a displayed
//! requirement count converts into a true instance count (e.g. "24
//! personnel" meaning 4 crew carriers of capacity 6).
//!
//! Compiled once by [`crate::catalog`], immutable afterwards; safe to query
//! from any number of threads.

use crate::catalog::CapabilitySet;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::trace;

#[cfg(test)]
#[path = "classifier/tests.rs"]
mod tests;

/// The game's canonical numeric identifier for a resource/vehicle type.
pub type TypeId = u32;

/// A compiled pattern-expression rule (tier 3).
#[derive(Debug)]
pub(crate) struct PatternRule {
    pub(crate) id: TypeId,
    pub(crate) regex: Regex,
}

/// A compiled quantity-conversion rule, kept in declaration order.
#[derive(Debug)]
pub(crate) struct QuantityRule {
    pub(crate) id: TypeId,
    pub(crate) regex: Regex,
    pub(crate) quantity: u32,
}

/// Immutable requirement-name resolver compiled from the rule database.
#[derive(Debug, Default)]
pub struct Classifier {
    /// Normalized text -> type ids, in rule declaration order.
    ///
    /// A `BTreeMap` keeps the substring-fallback scan deterministic.
    pub(crate) exact: BTreeMap<String, Vec<TypeId>>,
    pub(crate) patterns: Vec<PatternRule>,
    pub(crate) quantities: Vec<QuantityRule>,
    pub(crate) capabilities: HashMap<TypeId, CapabilitySet>,
    /// Types opted out of the substring-fallback tier.
    pub(crate) matchless: HashSet<TypeId>,
}

impl Classifier {
    /// Compile a classifier from loaded catalog data.
    pub fn compile(data: &crate::catalog::CatalogData) -> Self {
        crate::catalog::build(data)
    }

    /// Resolve free requirement text to canonical type ids.
    ///
    /// Returns an empty vec for unmatched input; never fails. The result is
    /// deduplicated and deterministic for a given compiled rule set.
    pub fn resolve(&self, text: &str) -> Vec<TypeId> {
        let clean = normalize(text);
        if clean.is_empty() {
            return Vec::new();
        }

        // Tier 1: exact index hit.
        if let Some(ids) = self.exact.get(&clean) {
            return ids.clone();
        }

        // Tier 2: singular/plural fuzz against the same index.
        if let Some(ids) = self.exact.get(&format!("{clean}s")) {
            return ids.clone();
        }
        if let Some(stripped) = clean.strip_suffix('s') {
            if let Some(ids) = self.exact.get(stripped) {
                return ids.clone();
            }
        }

        // Tier 3: pattern expressions against the raw (non-normalized) text.
        let mut ids: Vec<TypeId> = Vec::new();
        for rule in &self.patterns {
            if rule.regex.is_match(text) && !ids.contains(&rule.id) {
                ids.push(rule.id);
            }
        }
        if !ids.is_empty() {
            return ids;
        }

        // Tier 4: aggressive substring fallback, minus matchless types.
        for (key, key_ids) in &self.exact {
            if key.contains(clean.as_str()) || clean.contains(key.as_str()) {
                for id in key_ids {
                    if !self.matchless.contains(id) && !ids.contains(id) {
                        ids.push(*id);
                    }
                }
            }
        }
        if !ids.is_empty() {
            trace!("substring fallback resolved '{text}' -> {ids:?}");
        }
        ids
    }

    /// Capability tags for a type; empty for unknown ids.
    pub fn capabilities(&self, id: TypeId) -> CapabilitySet {
        self.capabilities.get(&id).copied().unwrap_or(CapabilitySet::empty())
    }

    /// All type ids carrying `tag`, ascending.
    pub fn ids_with_capability(&self, tag: CapabilitySet) -> Vec<TypeId> {
        let mut ids: Vec<TypeId> =
            self.capabilities.iter().filter(|(_, caps)| caps.contains(tag)).map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids
    }

    /// Convert a displayed requirement count into the true instance count.
    ///
    /// Two candidate descriptions are tried — `"{displayed} {name}"` and the
    /// bare name — against the type's quantity rules in declaration order;
    /// the first match wins. No match means the displayed count stands.
    pub fn resolve_quantity(&self, id: TypeId, name: &str, displayed: u32) -> u32 {
        let with_count = format!("{displayed} {name}");
        for rule in &self.quantities {
            if rule.id != id {
                continue;
            }
            if rule.regex.is_match(&with_count) || rule.regex.is_match(name) {
                return rule.quantity;
            }
        }
        displayed
    }
}

/// Normalize text for index lookups: lowercase, ASCII alphanumerics only.
///
/// "Platform Truck" and "platform-truck" both become "platformtruck".
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase().chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
