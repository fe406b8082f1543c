//! Read-only snapshot of the simulation produced every tick.

use serde::{Deserialize, Serialize};

use crate::components::{Allegiance, BehaviorModes, Status, WeaponIntent};
use crate::enums::UnitType;
use crate::events::SimEvent;
use crate::types::{Kinematics, SimTime, UnitId};

/// View of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub allegiance: Allegiance,
    pub status: Status,
    pub kinematics: Kinematics,
    pub energy: f64,
}

/// Decision output of one autonomous unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSnapshot {
    pub id: UnitId,
    pub modes: BehaviorModes,
    pub target: Option<UnitId>,
    pub intent: WeaponIntent,
    pub refit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: SimTime,
    pub units: Vec<UnitSnapshot>,
    pub ai: Vec<AiSnapshot>,
    pub events: Vec<SimEvent>,
}

impl Snapshot {
    pub fn live_units(&self) -> usize {
        self.units.iter().filter(|u| u.status.alive).count()
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
