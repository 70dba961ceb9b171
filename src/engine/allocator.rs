//! Greedy per-mission instance commitment.
//!
//! The allocator walks the mission batch in reward order and commits
//! concrete instances to each mission without backtracking: once an
//! instance is promised it stays promised, even if a later mission would
//! have valued it more. Forced-first, credits-descending ordering makes
//! the greedy choice close to optimal for the reward model the game uses.
//!
//! Selection per mission runs in three passes (named lines, ambulances,
//! resource top-up); the shared "used instance ids" set guarantees the
//! pairwise-disjointness of the returned plans.

use super::feasibility;
use crate::api::{DispatchPlan, Inventory, MissionRecord, Options, PriorityClass, Verdict};
use crate::catalog::CapabilitySet;
use crate::classifier::Classifier;
use std::collections::HashSet;
use tracing::debug;

/// Requirement name used to resolve ambulance types for the patient pass.
const AMBULANCE: &str = "ambulance";

/// Run one allocation pass over `missions` against `inventory`.
///
/// Returns one plan per mission, in processing order (forced first, then
/// credits descending, ties in input order). Consumes nothing outside its
/// own pass-scoped used set; calling it twice on the same snapshot yields
/// identical output.
pub fn allocate(
    classifier: &Classifier,
    missions: &[MissionRecord],
    inventory: &Inventory,
    options: &Options,
) -> Vec<DispatchPlan> {
    let mut order: Vec<&MissionRecord> = missions.iter().collect();
    order.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));

    let mut used: HashSet<String> = HashSet::new();
    order
        .into_iter()
        .map(|mission| plan_mission(classifier, mission, inventory, &mut used, options))
        .collect()
}

fn sort_key(mission: &MissionRecord) -> (bool, u32) {
    (mission.priority == PriorityClass::Forced, mission.credits)
}

fn plan_mission(
    classifier: &Classifier,
    mission: &MissionRecord,
    inventory: &Inventory,
    used: &mut HashSet<String>,
    options: &Options,
) -> DispatchPlan {
    if !options.process_alliance && mission.is_alliance() {
        return skip(mission, "alliance processing disabled".to_string());
    }

    let mut reason = if mission.priority == PriorityClass::Forced {
        "force dispatch (alliance or incomplete)".to_string()
    } else {
        let verdict = feasibility::evaluate(classifier, mission, inventory, used);
        if !verdict.dispatchable {
            debug!("skipping mission {}: {}", mission.id, verdict.reason);
            return skip(mission, verdict.reason);
        }
        verdict.reason
    };

    let mut committed: Vec<String> = Vec::new();
    let mut water: u32 = 0;
    let mut foam: u32 = 0;

    select_named_lines(classifier, mission, inventory, used, &mut committed, &mut water, &mut foam);
    select_ambulances(classifier, mission, inventory, used, &mut committed);
    top_up_resources(classifier, mission, inventory, used, &mut committed, water, foam);

    // A positive feasibility signal with zero concrete matches must not be
    // sent with nothing attached.
    let verdict = if committed.is_empty() {
        reason = "no vehicles selected".to_string();
        Verdict::Skip
    } else {
        Verdict::Dispatch
    };

    DispatchPlan { mission_id: mission.id.clone(), committed, verdict, reason }
}

fn skip(mission: &MissionRecord, reason: String) -> DispatchPlan {
    DispatchPlan {
        mission_id: mission.id.clone(),
        committed: Vec::new(),
        verdict: Verdict::Skip,
        reason,
    }
}

/// Pass 1: walk the mission's named requirement lines in declared order and
/// commit unused instances of the resolved types, up to the converted
/// quantity target. Tank contents of every commitment feed the running
/// water/foam totals.
fn select_named_lines(
    classifier: &Classifier,
    mission: &MissionRecord,
    inventory: &Inventory,
    used: &mut HashSet<String>,
    committed: &mut Vec<String>,
    water: &mut u32,
    foam: &mut u32,
) {
    for line in &mission.requirements {
        if line.name.to_lowercase().contains(AMBULANCE) {
            continue;
        }

        let ids = classifier.resolve(&line.name);
        if ids.is_empty() {
            debug!("mission {}: no type matches requirement '{}'", mission.id, line.name);
            continue;
        }

        let mut selected: u32 = 0;
        'line: for id in &ids {
            // The conversion target depends on the candidate's type: "24
            // personnel" may mean 4 carriers for one type and 24 for another.
            let target = classifier.resolve_quantity(*id, &line.name, line.count);
            let Some(pool) = inventory.instances.get(id) else { continue };
            for instance in pool {
                if selected >= target {
                    break 'line;
                }
                if used.contains(instance) {
                    continue;
                }
                used.insert(instance.clone());
                committed.push(instance.clone());
                let tank = inventory.tank(instance);
                *water += tank.water;
                *foam += tank.foam;
                selected += 1;
            }
        }
    }
}

/// Pass 2: one ambulance per patient, unless an explicit ambulance line
/// declares its own count.
fn select_ambulances(
    classifier: &Classifier,
    mission: &MissionRecord,
    inventory: &Inventory,
    used: &mut HashSet<String>,
    committed: &mut Vec<String>,
) {
    if mission.patients == 0 {
        return;
    }

    let count = mission
        .requirements
        .iter()
        .find(|line| line.name.to_lowercase().contains(AMBULANCE))
        .map(|line| line.count)
        .unwrap_or(mission.patients);

    let mut sent: u32 = 0;
    'pass: for id in classifier.resolve(AMBULANCE) {
        let Some(pool) = inventory.instances.get(&id) else { continue };
        for instance in pool {
            if sent >= count {
                break 'pass;
            }
            if used.contains(instance) {
                continue;
            }
            used.insert(instance.clone());
            committed.push(instance.clone());
            sent += 1;
        }
    }
}

/// Pass 3: when the running totals fall short of the mission's water/foam
/// budgets, pull in unused instances whose type carries the matching
/// capability tag and whose tank actually contributes to a still-short
/// resource. Stops as soon as both budgets are met.
fn top_up_resources(
    classifier: &Classifier,
    mission: &MissionRecord,
    inventory: &Inventory,
    used: &mut HashSet<String>,
    committed: &mut Vec<String>,
    mut water: u32,
    mut foam: u32,
) {
    if water >= mission.water_needed && foam >= mission.foam_needed {
        return;
    }

    'pass: for (id, pool) in &inventory.instances {
        let caps = classifier.capabilities(*id);
        if !caps.intersects(CapabilitySet::WATER | CapabilitySet::FOAM) {
            continue;
        }

        for instance in pool {
            if water >= mission.water_needed && foam >= mission.foam_needed {
                break 'pass;
            }
            if used.contains(instance) {
                continue;
            }

            let tank = inventory.tank(instance);
            let mut useful = false;
            if water < mission.water_needed && caps.contains(CapabilitySet::WATER) && tank.water > 0
            {
                water += tank.water;
                useful = true;
            }
            if foam < mission.foam_needed && caps.contains(CapabilitySet::FOAM) && tank.foam > 0 {
                foam += tank.foam;
                useful = true;
            }

            if useful {
                used.insert(instance.clone());
                committed.push(instance.clone());
            }
        }
    }
}
