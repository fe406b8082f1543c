//! Difficulty-specific behavioral profiles.
//!
//! Consolidates per-difficulty parameters for the decision core.

use sortie_core::enums::Difficulty;

/// Behavioral profile for a difficulty level.
pub struct AiProfile {
    /// Chance per re-roll of entering attack mode.
    pub attack_chance: f64,
    /// Chance per re-roll of defending even while attacking.
    pub defend_chance: f64,
    /// Chance per re-roll of going after the opponent's structures.
    pub steal_chance: f64,
    /// Chance per re-roll that each target-type flag is set.
    pub target_chance: f64,
    /// Chance per re-roll of seeking cloud cover.
    pub cloud_chance: f64,
    /// Chance that being struck starts a hunt for aircraft.
    pub hunt_chance: f64,
    /// Energy below which a hit from an aircraft triggers missile retaliation.
    pub retaliation_energy: f64,
}

/// Get the behavioral profile for a given difficulty.
pub fn get_profile(difficulty: Difficulty) -> AiProfile {
    match difficulty {
        Difficulty::Easy => AiProfile {
            attack_chance: 0.35,
            defend_chance: 0.5,
            steal_chance: 0.0,
            target_chance: 0.35,
            cloud_chance: 0.5,
            hunt_chance: 0.25,
            retaliation_energy: 1.0,
        },
        Difficulty::Hard => AiProfile {
            attack_chance: 0.6,
            defend_chance: 0.35,
            steal_chance: 0.15,
            target_chance: 0.5,
            cloud_chance: 0.35,
            hunt_chance: 0.5,
            retaliation_energy: 2.0,
        },
        Difficulty::Extreme => AiProfile {
            attack_chance: 0.8,
            defend_chance: 0.25,
            steal_chance: 0.3,
            target_chance: 0.65,
            cloud_chance: 0.25,
            hunt_chance: 0.75,
            retaliation_energy: 4.0,
        },
    }
}
