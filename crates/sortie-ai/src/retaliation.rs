//! Event-triggered responses to being struck.
//!
//! Two independent decisions: whether to start hunting aircraft, and
//! whether to answer with a guided missile.

use rand::Rng;

use sortie_core::components::BehaviorModes;
use sortie_core::config::AiConfig;
use sortie_core::constants::*;
use sortie_core::enums::{Difficulty, UnitType};

use crate::profiles::AiProfile;

/// Situation of a unit at the moment it is struck.
pub struct StruckContext {
    pub energy: f64,
    pub attacker_type: UnitType,
    pub ammo: u32,
    pub smart_missiles: u32,
    /// Missiles already sent at this attacker.
    pub missiles_at_target: u32,
    pub missile_cooldown_active: bool,
    pub difficulty: Difficulty,
    pub ammo_restricted: bool,
}

/// Outcome of the missile retaliation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissileDecision {
    Hold,
    Launch { cooldown_ticks: u64 },
}

/// Whether a hit should roll for starting a hunt. The roll itself is
/// throttled by the caller's hit-response cooldown.
pub fn should_roll_hunt(modes: &BehaviorModes, config: &AiConfig, hit_response_active: bool) -> bool {
    config.allow_hunt && !modes.target_helicopters && !hit_response_active
}

/// Draw the hunt roll. Always consumes exactly one value.
pub fn roll_hunt<R: Rng>(rng: &mut R, profile: &AiProfile) -> bool {
    rng.gen::<f64>() < profile.hunt_chance
}

/// Decide whether to launch a retaliation missile.
pub fn evaluate_missile(ctx: &StruckContext, profile: &AiProfile) -> MissileDecision {
    if ctx.smart_missiles == 0 || ctx.missile_cooldown_active {
        return MissileDecision::Hold;
    }

    let provoked = ctx.attacker_type.is_aircraft() && ctx.energy < profile.retaliation_energy;
    let out_of_ammo = ctx.ammo_restricted && ctx.ammo == 0;
    if !provoked && !out_of_ammo {
        return MissileDecision::Hold;
    }

    // One missile per target, except on the hardest setting.
    if ctx.missiles_at_target > 0 && ctx.difficulty != Difficulty::Extreme {
        return MissileDecision::Hold;
    }

    MissileDecision::Launch {
        cooldown_ticks: MISSILE_COOLDOWN_TICKS
            + MISSILE_REPEAT_COOLDOWN_TICKS * ctx.missiles_at_target as u64,
    }
}

/// Delay before the missile leaves the rail, inside the configured window.
pub fn launch_delay<R: Rng>(rng: &mut R) -> u64 {
    rng.gen_range(MISSILE_DELAY_MIN_TICKS..=MISSILE_DELAY_MAX_TICKS)
}
