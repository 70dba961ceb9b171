use super::{Classifier, TypeId, normalize};
use crate::catalog::{CapabilitySet, CatalogData, ExtendPattern, PatternBlock, TypeRecord};
use std::collections::BTreeMap;

fn rec(id: TypeId, base: &[&str], extend: &[(&str, u32)], matchless: bool) -> TypeRecord {
    TypeRecord {
        id,
        pattern: PatternBlock {
            base: base.iter().map(|s| s.to_string()).collect(),
            extend: extend
                .iter()
                .map(|(pattern, quantity)| ExtendPattern {
                    pattern: pattern.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        },
        matchless,
    }
}

fn fixture() -> Classifier {
    let mut categories = BTreeMap::new();
    categories.insert("police_cars".to_string(), vec![10, 19]);
    categories.insert("water_needed".to_string(), vec![30]);

    let types = vec![
        rec(0, &["fire truck", "type 1 fire engine"], &[], false),
        rec(3, &["platform truck", r"/ladder\s*truck/"], &[], false),
        rec(5, &["ambulance", "als ambulance"], &[], false),
        rec(
            7,
            &["fire personnel carrier", "crew carrier"],
            &[(r"\b24 personnel\b", 4), (r"\b12 personnel\b", 2)],
            false,
        ),
        rec(9, &["van"], &[], true),
        rec(22, &["floodlights"], &[], false),
        rec(30, &["water tanker"], &[], false),
        rec(40, &["fire truck special"], &[], false),
    ];

    Classifier::compile(&CatalogData::from_records(types, categories))
}

#[test]
fn normalization_strips_case_and_punctuation() {
    assert_eq!(normalize("Platform Truck"), "platformtruck");
    assert_eq!(normalize("platform-truck!"), "platformtruck");
    assert_eq!(normalize("  Type 1 Fire Engine "), "type1fireengine");
    assert_eq!(normalize("---"), "");
}

#[test]
fn exact_tier_matches_normalized_text() {
    let c = fixture();
    assert_eq!(c.resolve("Fire Truck"), vec![0]);
    assert_eq!(c.resolve("platform-truck"), vec![3]);
    assert_eq!(c.resolve("Type 1 Fire Engine"), vec![0]);
}

#[test]
fn exact_tier_short_circuits_later_tiers() {
    // "fire truck" also substring-matches the "fire truck special" key for
    // type 40, but the exact tier already produced a result, so the
    // fallback must not contribute.
    let c = fixture();
    assert_eq!(c.resolve("fire truck"), vec![0]);
}

#[test]
fn fuzzy_tier_handles_singular_plural() {
    let c = fixture();
    // Plural input, singular index key.
    assert_eq!(c.resolve("Fire Trucks"), vec![0]);
    assert_eq!(c.resolve("ambulances"), vec![5]);
    // Singular input, plural index key.
    assert_eq!(c.resolve("floodlight"), vec![22]);
}

#[test]
fn pattern_tier_runs_on_raw_text() {
    let c = fixture();
    // "ladder truck needed" has no normalized index entry; the /ladder\s*truck/
    // pattern expression fires against the raw text.
    assert_eq!(c.resolve("Ladder Truck needed"), vec![3]);
}

#[test]
fn substring_fallback_matches_both_directions() {
    let c = fixture();
    // Input contained in a key.
    assert_eq!(c.resolve("police"), vec![10, 19]);
    // Key contained in the input.
    assert_eq!(c.resolve("heavy water tanker unit"), vec![30]);
}

#[test]
fn matchless_types_skip_fallback_but_not_exact() {
    let c = fixture();
    // "prisoner van" would only reach type 9 through the substring tier,
    // which the matchless flag blocks.
    assert_eq!(c.resolve("prisoner van"), Vec::<TypeId>::new());
    // Exact lookups still work for matchless types.
    assert_eq!(c.resolve("van"), vec![9]);
}

#[test]
fn unmatched_text_yields_empty_set() {
    let c = fixture();
    assert!(c.resolve("HazMat").is_empty());
    assert!(c.resolve("").is_empty());
    assert!(c.resolve("!!!").is_empty());
}

#[test]
fn capabilities_lookup() {
    let c = fixture();
    assert!(c.capabilities(30).contains(CapabilitySet::WATER));
    assert!(c.capabilities(5).contains(CapabilitySet::PATIENT));
    assert_eq!(c.capabilities(999), CapabilitySet::empty());
    assert_eq!(c.ids_with_capability(CapabilitySet::WATER), vec![30]);
}

#[test]
fn quantity_conversion_first_matching_rule_wins() {
    let c = fixture();
    // "24 personnel" -> 4 carriers of capacity 6.
    assert_eq!(c.resolve_quantity(7, "personnel", 24), 4);
    assert_eq!(c.resolve_quantity(7, "personnel", 12), 2);
    // No rule matches: the displayed count stands.
    assert_eq!(c.resolve_quantity(7, "personnel", 6), 6);
    // Rules are scoped to their type id.
    assert_eq!(c.resolve_quantity(0, "personnel", 24), 24);
}

#[test]
fn quantity_conversion_tries_bare_name_candidate() {
    let types = vec![rec(11, &["traffic control"], &[("traffic control", 2)], false)];
    let c = Classifier::compile(&CatalogData::from_records(types, BTreeMap::new()));
    // The bare requirement name matches even though "5 traffic control"
    // would too; either candidate is enough.
    assert_eq!(c.resolve_quantity(11, "Traffic Control", 5), 2);
}

#[test]
fn resolution_is_deterministic() {
    let c = fixture();
    for _ in 0..3 {
        assert_eq!(c.resolve("police"), vec![10, 19]);
        assert_eq!(c.resolve("fire truck"), vec![0]);
    }
}
