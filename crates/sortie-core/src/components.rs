//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Game logic lives in systems and in the pure decision functions of
//! `sortie-ai`, not in components.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::UnitId;

/// Faction state. Neutral and hostile units bypass normal faction filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allegiance {
    pub is_enemy: bool,
    pub is_neutral: bool,
    /// Fights both sides. Never raised by the simulation itself; the host
    /// sets it on units it spawns (e.g. a rogue unit in a custom scenario).
    pub is_hostile: bool,
}

/// Liveness and visibility flags.
///
/// The simulation owns `alive`, `cloaked`, `expired` and `detected`.
/// `inert`, `exclude_from_collision` and `respawning` belong to the host
/// (the renderer or session layer) and are only read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub alive: bool,
    /// Hidden from targeting. Aircraft are cloaked while inside a cloud.
    pub cloaked: bool,
    /// Present in the world but not participating (e.g. a dead shell).
    pub inert: bool,
    /// Aged projectile that can no longer deal damage.
    pub expired: bool,
    /// Skip this unit as a collision candidate (e.g. infantry inside a bunker).
    pub exclude_from_collision: bool,
    /// Spotted by the opposing side; lets launchers be targeted from afar.
    pub detected: bool,
    /// Between death and respawn; AI does not run.
    pub respawning: bool,
}

/// Left/right orientation flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub flipped: bool,
}

/// Hit points. Every unit has some; zero means dead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub current: f64,
    pub max: f64,
}

/// Consumable combat resources carried by controllable units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub fuel: f64,
    pub max_fuel: f64,
    pub ammo: u32,
    pub max_ammo: u32,
    pub bombs: u32,
    pub max_bombs: u32,
    pub smart_missiles: u32,
    pub max_smart_missiles: u32,
    pub paratroopers: u32,
    pub max_paratroopers: u32,
    pub decoys: u32,
    pub max_decoys: u32,
}

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub parent: UnitId,
    pub parent_type: UnitType,
}

/// Remaining lifetime in ticks for transient units. At zero the unit expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifetime {
    pub ticks_left: u32,
}

/// One (type, group) entry of a collision spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionTarget {
    pub unit_type: UnitType,
    pub group: FactionGroup,
}

/// Immutable description of what a unit may collide with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionSpec {
    pub targets: Vec<CollisionTarget>,
    /// Forward extension of the source box in its direction of travel.
    pub lookahead: Option<f64>,
    /// Sub-frame interpolated checks for fast movers.
    pub tween: bool,
    /// Only same-side candidates are considered.
    pub friendly_only: bool,
}

/// Marks a unit as driven by the decision core rather than human input.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AiControlled;

/// Independently recomputed capability vector. Not a state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorModes {
    pub attack: bool,
    pub defend: bool,
    pub steal: bool,
    pub target_helicopters: bool,
    pub target_tanks: bool,
    pub target_bunkers: bool,
    pub target_super_bunkers: bool,
    pub target_end_bunkers: bool,
    pub target_clouds: bool,
    pub target_turrets: bool,
    pub target_men: bool,
    pub target_vans: bool,
    pub retaliation: bool,
}

/// A single vote for firing or bombing at a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub target: UnitId,
    /// Horizontal distance from the voter at vote time.
    pub dx: f64,
}

/// Per-tick weapon intents consumed by the external ordnance module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponIntent {
    pub firing: bool,
    pub bombing: bool,
    pub missile_launching: bool,
    pub parachuting: bool,
    pub decoying: bool,
    /// Horizontally-nearest voted target, for rate and aim selection.
    pub vote_target: Option<UnitId>,
}

/// Position the steering module is asked to move toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteerTarget {
    pub x: f64,
    pub y: f64,
    pub unit_type: Option<UnitType>,
}

/// Decision state of an autonomous unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiState {
    pub modes: BehaviorModes,
    pub target: Option<UnitId>,
    pub ammo_votes: Vec<Vote>,
    pub bomb_votes: Vec<Vote>,
    pub intent: WeaponIntent,
    pub steer: Option<SteerTarget>,
    /// Heading home to refuel and rearm.
    pub refit: bool,
    /// Sitting on a friendly landing pad.
    pub landed: bool,
    pub next_reroll_tick: u64,
    /// Smart missiles already launched, per target.
    pub missiles_fired_at: BTreeMap<UnitId, u32>,
    /// A deployment that has been planned but not yet completed.
    pub pending_action: Option<SpecialAction>,
}

/// Opaque handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Named cooldowns currently running for a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    pub active: BTreeMap<Cooldown, TimerHandle>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            alive: true,
            cloaked: false,
            inert: false,
            expired: false,
            exclude_from_collision: false,
            detected: false,
            respawning: false,
        }
    }
}

impl Allegiance {
    pub fn side(&self) -> Side {
        Side::from_enemy_flag(self.is_enemy)
    }
}

impl Energy {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }
}

impl Resources {
    /// Empty loadout for units that carry nothing.
    pub fn none() -> Self {
        Self::default()
    }
}
