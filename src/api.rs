use crate::classifier::{Classifier, TypeId};
use crate::engine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Keywords in a mission name that force a dispatch regardless of
/// feasibility scoring: the incident is already partly serviced, or came
/// in through the alliance.
const FORCED_NAME_KEYWORDS: &[&str] = &["missing", "incomplete", "[alliance]"];
const ALLIANCE_TAG: &str = "[alliance]";

/// One row of a mission's stated needs, pre-classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementLine {
    /// Free text scraped from the requirement table or alert banner.
    pub name: String,
    /// The count as displayed on the page (quantity conversion comes later).
    pub count: u32,
}

/// How a mission enters the allocation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityClass {
    /// Must be serviced; bypasses feasibility scoring.
    Forced,
    #[default]
    Normal,
}

impl PriorityClass {
    /// Derive the priority class from a scraped mission name.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if FORCED_NAME_KEYWORDS.iter().any(|k| lower.contains(k)) {
            PriorityClass::Forced
        } else {
            PriorityClass::Normal
        }
    }
}

/// One open incident, as assembled by the scraping layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub priority: PriorityClass,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub requirements: Vec<RequirementLine>,
    #[serde(default)]
    pub patients: u32,
    /// "Car to tow" count; carried through for transport consumers, not
    /// allocated against.
    #[serde(default)]
    pub crashed_cars: u32,
    #[serde(default)]
    pub water_needed: u32,
    #[serde(default)]
    pub foam_needed: u32,
}

impl MissionRecord {
    /// True when the mission came in through the alliance.
    pub fn is_alliance(&self) -> bool {
        self.name.to_lowercase().contains(ALLIANCE_TAG)
    }
}

/// Water/foam capacity of one concrete instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tank {
    #[serde(default)]
    pub water: u32,
    #[serde(default)]
    pub foam: u32,
}

/// Snapshot of the instances the player currently owns.
///
/// Rebuilt from a fresh scrape before each allocation pass; a new snapshot
/// fully replaces the previous one, there is no incremental update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Canonical type id -> owned instance ids, in scrape order.
    #[serde(default)]
    pub instances: BTreeMap<TypeId, Vec<String>>,
    /// Per-instance tank capacities; instances without an entry carry none.
    #[serde(default)]
    pub tanks: HashMap<String, Tank>,
}

impl Inventory {
    pub fn tank(&self, instance: &str) -> Tank {
        self.tanks.get(instance).copied().unwrap_or_default()
    }

    /// Total number of owned instances across all types.
    pub fn len(&self) -> usize {
        self.instances.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.values().all(Vec::is_empty)
    }
}

/// Allocation-pass options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Process alliance missions at all; when false they are skipped before
    /// feasibility, mirroring the game setting of the same name.
    pub process_alliance: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { process_alliance: true }
    }
}

/// Final decision for one mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Dispatch,
    Skip,
}

/// What one allocation pass decided for one mission.
///
/// `committed` preserves commitment order — the driving layer clicks the
/// checkboxes in exactly this order before pressing dispatch. Within one
/// pass no instance id appears in more than one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPlan {
    pub mission_id: String,
    pub committed: Vec<String>,
    pub verdict: Verdict,
    /// Human-readable justification, also the only surface for degraded
    /// conditions (unresolved lines, shortfalls, empty commitments).
    pub reason: String,
}

/// Run one full allocation pass over a batch of missions.
///
/// Missions are processed forced-first, then by credit value descending
/// (stable for ties); the returned plans are in processing order. The pass
/// is pure: given the same snapshot it returns the same plans.
pub fn plan_dispatch(
    classifier: &Classifier,
    missions: &[MissionRecord],
    inventory: &Inventory,
    options: &Options,
) -> Vec<DispatchPlan> {
    engine::allocate(classifier, missions, inventory, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_from_name_flags_forced_missions() {
        assert_eq!(PriorityClass::from_name("Missing: House Fire"), PriorityClass::Forced);
        assert_eq!(PriorityClass::from_name("Incomplete barn fire"), PriorityClass::Forced);
        assert_eq!(PriorityClass::from_name("[Alliance] Pile-up"), PriorityClass::Forced);
        assert_eq!(PriorityClass::from_name("House Fire"), PriorityClass::Normal);
    }

    #[test]
    fn alliance_detection_is_case_insensitive() {
        let mission =
            MissionRecord { name: "[ALLIANCE] Train Derailment".to_string(), ..Default::default() };
        assert!(mission.is_alliance());
    }

    #[test]
    fn inventory_tank_defaults_to_empty() {
        let mut inventory = Inventory::default();
        inventory.tanks.insert("a".to_string(), Tank { water: 2000, foam: 0 });
        assert_eq!(inventory.tank("a").water, 2000);
        assert_eq!(inventory.tank("b"), Tank::default());
    }

    #[test]
    fn mission_record_deserializes_scrape_shape() {
        let mission: MissionRecord = serde_json::from_str(
            r#"{
                "id": "8412",
                "name": "Brush Fire",
                "credits": 250,
                "requirements": [{ "name": "fire truck", "count": 2 }],
                "patients": 1,
                "water_needed": 3000
            }"#,
        )
        .unwrap();

        assert_eq!(mission.priority, PriorityClass::Normal);
        assert_eq!(mission.requirements.len(), 1);
        assert_eq!(mission.water_needed, 3000);
        assert_eq!(mission.foam_needed, 0);
    }
}
