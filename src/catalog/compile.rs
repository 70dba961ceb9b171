//! Record compilation: indexes, pattern rules, and capability derivation.
//!
//! `build` is the only entry point. It walks the loaded [`CatalogData`] and
//! produces the immutable [`Classifier`]:
//!
//! - category names and plain base patterns land in the normalized exact
//!   index (with a singular alias for trailing-`s` category names);
//! - `/…/` base patterns and all quantity patterns are compiled as
//!   case-insensitive regexes, in declaration order;
//! - capability tags are derived from keyword sets matched against each
//!   record's pattern text and category memberships.
//!
//! A pattern that fails to compile is dropped with a warning; the rest of
//! the record survives.

use super::records::{CatalogData, TypeRecord};
use crate::classifier::{Classifier, PatternRule, QuantityRule, TypeId, normalize};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

bitflags::bitflags! {
    /// Semantic capability tags attached to canonical type ids.
    ///
    /// Derived once at load time from multi-language keyword sets. `WATER`
    /// and `FOAM` drive the allocator's resource top-up pass; the remaining
    /// tags are exposed for the scraping/transport layers (e.g. routing a
    /// prisoner-transport alert instead of dispatching against it).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u8 {
        const WATER     = 1 << 0;
        const FOAM      = 1 << 1;
        const PERSONNEL = 1 << 2;
        const PRISONER  = 1 << 3;
        const PATIENT   = 1 << 4;
        const TOW       = 1 << 5;
    }
}

/// Keyword sets per capability tag, case-insensitive and multi-language.
///
/// False positives are acceptable here the same way they are in any coarse
/// keyword scan: a wrongly tagged type only becomes a top-up *candidate*;
/// commitment still requires a nonzero tank contribution.
fn keyword_sets() -> [(CapabilitySet, &'static Regex); 6] {
    [
        (CapabilitySet::WATER, regex!(r"(?i)\b(water|wasser|eau|agua|tanker)\b")),
        (CapabilitySet::FOAM, regex!(r"(?i)\b(foam|schaum|mousse|espuma)\b")),
        (CapabilitySet::PERSONNEL, regex!(r"(?i)\b(personnel|crew|staff|besatzung)\b")),
        (CapabilitySet::PRISONER, regex!(r"(?i)\b(prisoner|prison|gefangenen?|cell)\b")),
        (CapabilitySet::PATIENT, regex!(r"(?i)\b(ambulance|ambulanz|patient|ems|medic|rettung)\b")),
        (CapabilitySet::TOW, regex!(r"(?i)\b(tow|wrecker|abschlepp\w*|remorquage)\b")),
    ]
}

/// Compile the catalog into an immutable classifier.
pub(crate) fn build(data: &CatalogData) -> Classifier {
    let mut exact: BTreeMap<String, Vec<TypeId>> = BTreeMap::new();
    let mut patterns: Vec<PatternRule> = Vec::new();
    let mut quantities: Vec<QuantityRule> = Vec::new();
    let mut capabilities: HashMap<TypeId, CapabilitySet> = HashMap::new();
    let mut matchless: HashSet<TypeId> = HashSet::new();

    // Categories first: the category name itself is matchable
    // ("police_cars" -> policecars), plus a singular alias.
    for (category, ids) in &data.categories {
        let key = normalize(category);
        if key.is_empty() {
            continue;
        }
        add_to_index(&mut exact, &key, ids);
        if let Some(singular) = key.strip_suffix('s') {
            add_to_index(&mut exact, singular, ids);
        }
    }

    for record in &data.types {
        for pat in &record.pattern.base {
            match pattern_expression(pat) {
                Some(expr) => match Regex::new(&format!("(?i){expr}")) {
                    Ok(regex) => patterns.push(PatternRule { id: record.id, regex }),
                    Err(err) => {
                        warn!("dropping malformed pattern for type {}: {err}", record.id);
                    }
                },
                None => add_to_index(&mut exact, &normalize(pat), &[record.id]),
            }
        }

        for ext in &record.pattern.extend {
            match Regex::new(&format!("(?i){}", ext.pattern)) {
                Ok(regex) => {
                    quantities.push(QuantityRule { id: record.id, regex, quantity: ext.quantity });
                }
                Err(err) => {
                    warn!("dropping malformed quantity pattern for type {}: {err}", record.id);
                }
            }
        }

        if record.matchless {
            matchless.insert(record.id);
        }

        let caps = derive_capabilities(record, &data.categories);
        if !caps.is_empty() {
            capabilities.insert(record.id, caps);
        }
    }

    debug!(
        "compiled catalog: {} index keys, {} pattern rules, {} quantity rules",
        exact.len(),
        patterns.len(),
        quantities.len()
    );

    Classifier { exact, patterns, quantities, capabilities, matchless }
}

/// Returns the inner expression when `pat` is a `/…/` pattern expression.
fn pattern_expression(pat: &str) -> Option<&str> {
    let inner = pat.strip_prefix('/')?.strip_suffix('/')?;
    if inner.is_empty() { None } else { Some(inner) }
}

fn add_to_index(exact: &mut BTreeMap<String, Vec<TypeId>>, key: &str, ids: &[TypeId]) {
    if key.is_empty() {
        return;
    }
    let entry = exact.entry(key.to_string()).or_default();
    for id in ids {
        if !entry.contains(id) {
            entry.push(*id);
        }
    }
}

/// Match capability keywords against everything textual we know about a
/// record: its base patterns and the names of the categories it belongs to.
fn derive_capabilities(
    record: &TypeRecord,
    categories: &BTreeMap<String, Vec<TypeId>>,
) -> CapabilitySet {
    let mut corpus = String::new();
    for pat in &record.pattern.base {
        corpus.push_str(pattern_expression(pat).unwrap_or(pat));
        corpus.push('\n');
    }
    for (name, ids) in categories {
        if ids.contains(&record.id) {
            // Underscores would defeat the word-boundary keyword match.
            corpus.push_str(&name.replace('_', " "));
            corpus.push('\n');
        }
    }

    let mut caps = CapabilitySet::empty();
    for (tag, keywords) in keyword_sets() {
        if keywords.is_match(&corpus) {
            caps |= tag;
        }
    }
    caps
}
