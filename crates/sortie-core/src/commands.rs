//! Input commands applied at the start of a tick.
//!
//! Only direct human input and explicit scenario edits come through here.
//! Autonomous decisions are never replicated as commands; peers recompute
//! them from identical seeds.

use serde::{Deserialize, Serialize};

use crate::enums::UnitType;
use crate::types::UnitId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    /// Populate the default battlefield.
    StartBattle,
    /// Spawn one unit.
    SpawnUnit {
        unit_type: UnitType,
        is_enemy: bool,
        x: f64,
        y: f64,
        ai: bool,
    },
    /// Remove a unit immediately, as if killed.
    DestroyUnit { unit: UnitId },
    /// Human flight input: set velocity and facing.
    MoveUnit {
        unit: UnitId,
        vx: f64,
        vy: f64,
        flipped: bool,
    },
    /// External damage source (scripted or replicated).
    StrikeUnit {
        unit: UnitId,
        attacker: UnitId,
        attacker_type: UnitType,
        damage: f64,
    },
    /// Reveal a unit to the opposing side.
    MarkDetected { unit: UnitId },
    /// Toggle replicated-session behavior.
    SetNetworkMode { enabled: bool },
}
