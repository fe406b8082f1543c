//! Periodic behavior-mode re-roll.
//!
//! The mode vector is recomputed from scratch every interval: static gates
//! from configuration, fresh draws from the caller's seeded stream, and
//! sticky state that outlives a single roll.

use rand::Rng;

use sortie_core::components::BehaviorModes;
use sortie_core::config::AiConfig;

use crate::profiles::AiProfile;

/// Number of draws one re-roll consumes. Constant regardless of gates, so
/// streams stay aligned across peers with different loadouts.
pub const DRAWS_PER_REROLL: usize = 12;

/// Everything a re-roll depends on besides randomness.
pub struct ModeInputs<'a> {
    pub config: &'a AiConfig,
    pub profile: &'a AiProfile,
    /// Unit currently carries bombs.
    pub has_bombs: bool,
    /// Unit currently carries gun ammunition.
    pub has_ammo: bool,
    /// Retaliation is still running from an earlier provocation.
    pub retaliation_active: bool,
}

/// Recompute the full mode vector.
pub fn reroll<R: Rng>(rng: &mut R, inputs: &ModeInputs) -> BehaviorModes {
    let mut rolls = [0.0_f64; DRAWS_PER_REROLL];
    for roll in rolls.iter_mut() {
        *roll = rng.gen::<f64>();
    }

    let cfg = inputs.config;
    let p = inputs.profile;
    let hit = |i: usize, chance: f64| rolls[i] < chance;

    let attack = hit(0, p.attack_chance);
    let defend = !attack || hit(1, p.defend_chance);
    let armed = inputs.has_ammo || inputs.has_bombs;

    BehaviorModes {
        attack,
        defend,
        steal: cfg.allow_steal && hit(2, p.steal_chance),
        target_helicopters: cfg.target_helicopters && inputs.has_ammo && hit(3, p.target_chance),
        target_tanks: cfg.target_tanks && inputs.has_bombs && hit(4, p.target_chance),
        target_bunkers: cfg.target_bunkers && armed && hit(5, p.target_chance),
        target_super_bunkers: cfg.target_super_bunkers && armed && hit(6, p.target_chance),
        target_end_bunkers: cfg.target_end_bunkers && armed && hit(7, p.target_chance),
        target_clouds: cfg.target_clouds && hit(8, p.cloud_chance),
        target_turrets: cfg.target_turrets && inputs.has_bombs && hit(9, p.target_chance),
        target_men: cfg.target_men && inputs.has_bombs && hit(10, p.target_chance),
        target_vans: cfg.target_vans && inputs.has_bombs && hit(11, p.target_chance),
        retaliation: inputs.retaliation_active,
    }
}
