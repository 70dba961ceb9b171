//! Read-only go/no-go scoring for one mission.
//!
//! The evaluator answers "is this mission worth opening at all" before the
//! allocator spends instances on it. It simulates matching the mission's
//! requirement lines against a *copy* of the currently unused pool, so it
//! never mutates real inventory or the pass-level used set.
//!
//! The policy is deliberately permissive: any nonzero match dispatches.
//! Sending *something* beats waiting for a perfect fleet, because the game
//! credits partial service and the next pass can top the mission up.

use crate::api::{Inventory, MissionRecord, RequirementLine};
use crate::catalog::CapabilitySet;
use crate::classifier::{Classifier, TypeId};
use std::collections::{BTreeMap, HashSet};

/// Verdict of the feasibility evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feasibility {
    pub dispatchable: bool,
    pub reason: String,
}

/// Requirement names that describe medical transport rather than vehicles
/// to send; those lines are excluded from feasibility counting.
const TRANSPORT_KEYWORDS: &[&str] = &["ambulance", "ems", "patient"];

/// Score `mission` against the pool of instances not yet used this pass.
///
/// For every countable requirement line, up to `count` matching instances
/// are moved out of the simulation pool so no instance is counted twice
/// across lines. Forced missions never reach this function.
pub fn evaluate(
    classifier: &Classifier,
    mission: &MissionRecord,
    inventory: &Inventory,
    used: &HashSet<String>,
) -> Feasibility {
    let mut pool: BTreeMap<TypeId, Vec<&String>> = inventory
        .instances
        .iter()
        .map(|(id, ids)| (*id, ids.iter().filter(|i| !used.contains(*i)).collect()))
        .collect();

    let mut needed: u32 = 0;
    let mut found: u32 = 0;

    for line in &mission.requirements {
        if is_transport_line(classifier, line) {
            continue;
        }
        needed += line.count;

        let mut matched: u32 = 0;
        for id in classifier.resolve(&line.name) {
            if matched >= line.count {
                break;
            }
            if let Some(candidates) = pool.get_mut(&id) {
                while matched < line.count && !candidates.is_empty() {
                    candidates.remove(0);
                    matched += 1;
                }
            }
        }
        found += matched;
    }

    if needed == 0 {
        return Feasibility {
            dispatchable: true,
            reason: "only medical transport needed".to_string(),
        };
    }
    if found > 0 {
        return Feasibility { dispatchable: true, reason: format!("partial match: {found}/{needed}") };
    }
    Feasibility {
        dispatchable: false,
        reason: format!("insufficient: 0/{needed} vehicles found"),
    }
}

/// A line is medical/transport when its name says so, or when every type it
/// resolves to carries the PATIENT capability.
fn is_transport_line(classifier: &Classifier, line: &RequirementLine) -> bool {
    let lower = line.name.to_lowercase();
    if TRANSPORT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }
    let ids = classifier.resolve(&line.name);
    !ids.is_empty()
        && ids.iter().all(|id| classifier.capabilities(*id).contains(CapabilitySet::PATIENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogData, PatternBlock, TypeRecord};
    use std::collections::BTreeMap as Map;

    fn classifier() -> Classifier {
        let types = vec![
            TypeRecord {
                id: 0,
                pattern: PatternBlock {
                    base: vec!["fire truck".to_string()],
                    extend: Vec::new(),
                },
                matchless: false,
            },
            TypeRecord {
                id: 5,
                pattern: PatternBlock {
                    base: vec!["rescue ambulance".to_string()],
                    extend: Vec::new(),
                },
                matchless: false,
            },
        ];
        Classifier::compile(&CatalogData::from_records(types, Map::new()))
    }

    fn inventory(entries: &[(TypeId, &[&str])]) -> Inventory {
        let mut inventory = Inventory::default();
        for (id, ids) in entries {
            inventory
                .instances
                .insert(*id, ids.iter().map(|s| s.to_string()).collect());
        }
        inventory
    }

    fn mission(lines: &[(&str, u32)]) -> MissionRecord {
        MissionRecord {
            id: "m1".to_string(),
            name: "Test".to_string(),
            requirements: lines
                .iter()
                .map(|(name, count)| RequirementLine { name: name.to_string(), count: *count })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn unmatched_requirement_reports_shortfall() {
        let c = classifier();
        let verdict =
            evaluate(&c, &mission(&[("HazMat", 1)]), &inventory(&[(0, &["a"])]), &HashSet::new());
        assert!(!verdict.dispatchable);
        assert_eq!(verdict.reason, "insufficient: 0/1 vehicles found");
    }

    #[test]
    fn partial_match_is_dispatchable() {
        let c = classifier();
        let verdict = evaluate(
            &c,
            &mission(&[("fire truck", 3)]),
            &inventory(&[(0, &["a"])]),
            &HashSet::new(),
        );
        assert!(verdict.dispatchable);
        assert_eq!(verdict.reason, "partial match: 1/3");
    }

    #[test]
    fn transport_only_missions_pass_outright() {
        let c = classifier();
        let verdict = evaluate(&c, &mission(&[("Ambulance", 2)]), &inventory(&[]), &HashSet::new());
        assert!(verdict.dispatchable);
        assert_eq!(verdict.reason, "only medical transport needed");
    }

    #[test]
    fn simulation_pool_does_not_double_count_across_lines() {
        let c = classifier();
        // Both lines resolve to type 0; two instances cannot satisfy 2+2.
        let verdict = evaluate(
            &c,
            &mission(&[("fire truck", 2), ("fire trucks", 2)]),
            &inventory(&[(0, &["a", "b"])]),
            &HashSet::new(),
        );
        assert!(verdict.dispatchable);
        assert_eq!(verdict.reason, "partial match: 2/4");
    }

    #[test]
    fn used_instances_are_invisible() {
        let c = classifier();
        let used: HashSet<String> = ["a".to_string()].into_iter().collect();
        let verdict =
            evaluate(&c, &mission(&[("fire truck", 1)]), &inventory(&[(0, &["a"])]), &used);
        assert!(!verdict.dispatchable);
    }

    #[test]
    fn evaluation_leaves_inventory_untouched() {
        let c = classifier();
        let inv = inventory(&[(0, &["a", "b"])]);
        let before = inv.clone();
        let _ = evaluate(&c, &mission(&[("fire truck", 2)]), &inv, &HashSet::new());
        assert_eq!(inv.instances, before.instances);
    }
}
