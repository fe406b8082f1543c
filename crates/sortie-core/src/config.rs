//! Runtime configuration for a simulation run.
//!
//! Loaded once at startup from JSON (every field optional, falling back to
//! defaults) and never mutated by the simulation except through commands.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Difficulty;
use crate::error::{Result, SimError};

/// Gates consulted by the decision core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Being shot may start a hunt for the attacking aircraft.
    pub allow_hunt: bool,
    pub target_helicopters: bool,
    pub target_tanks: bool,
    pub target_bunkers: bool,
    pub target_super_bunkers: bool,
    pub target_end_bunkers: bool,
    pub target_clouds: bool,
    pub target_turrets: bool,
    pub target_men: bool,
    pub target_vans: bool,
    pub allow_steal: bool,
    /// Bombs are napalm: infantry clusters share one ledger entry.
    pub area_ordnance: bool,
    /// Loadout with no gun resupply: missiles fire whenever ammo runs dry.
    pub ammo_restricted: bool,
    /// Smart missiles count as incoming threats to shoot down.
    pub shoot_missiles: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs = same simulation.
    pub seed: u64,
    pub difficulty: Difficulty,
    pub world_width: f64,
    pub world_ceiling: f64,
    pub zone_width: f64,
    /// Replicated multi-peer session.
    pub network_mode: bool,
    pub ai: AiConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            allow_hunt: true,
            target_helicopters: true,
            target_tanks: true,
            target_bunkers: true,
            target_super_bunkers: true,
            target_end_bunkers: false,
            target_clouds: true,
            target_turrets: true,
            target_men: true,
            target_vans: true,
            allow_steal: true,
            area_ordnance: false,
            ammo_restricted: false,
            shoot_missiles: true,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::default(),
            world_width: WORLD_WIDTH,
            world_ceiling: WORLD_CEILING,
            zone_width: ZONE_WIDTH,
            network_mode: false,
            ai: AiConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.world_width > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "world_width must be positive, got {}",
                self.world_width
            )));
        }
        if !(self.zone_width > 0.0) || self.zone_width > self.world_width {
            return Err(SimError::InvalidConfig(format!(
                "zone_width must be in (0, world_width], got {}",
                self.zone_width
            )));
        }
        if !(self.world_ceiling > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "world_ceiling must be positive, got {}",
                self.world_ceiling
            )));
        }
        Ok(())
    }

    /// Number of zones covering the world.
    pub fn zone_count(&self) -> usize {
        (self.world_width / self.zone_width).ceil().max(1.0) as usize
    }
}
