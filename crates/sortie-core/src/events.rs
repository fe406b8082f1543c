//! Events emitted by the simulation for effects, audio and logging.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::UnitId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A unit came into existence.
    Spawned { unit: UnitId, unit_type: UnitType },
    /// Collision engine reported contact and the damage model applied it.
    Hit { source: UnitId, target: UnitId },
    /// A unit's energy reached zero.
    Destroyed { unit: UnitId, unit_type: UnitType },
    /// An autonomous unit re-rolled its behavior modes.
    ModesRerolled { unit: UnitId },
    /// An autonomous unit started hunting aircraft after being struck.
    HuntStarted { unit: UnitId },
    /// Retaliation mode switched on or off.
    Retaliation { unit: UnitId, active: bool },
    /// A guided missile left the rail.
    MissileLaunched { unit: UnitId, target: UnitId },
    /// Troops or decoys released.
    Deployed {
        unit: UnitId,
        action: SpecialAction,
        count: u32,
    },
    /// Refit started (heading to pad) or finished (fully restored).
    Refit { unit: UnitId, complete: bool },
    /// Infantry took over an opposing structure.
    Captured { unit: UnitId, side: Side },
    /// The bomb quota for a target was reached.
    BombQuotaReached { target: UnitId },
}
