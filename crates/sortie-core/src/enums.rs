//! Enumeration types used throughout the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Every kind of combat-relevant entity in the world. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Helicopter,
    Tank,
    Van,
    MissileLauncher,
    Infantry,
    Engineer,
    ParachuteInfantry,
    Bunker,
    SuperBunker,
    EndBunker,
    Turret,
    LandingPad,
    Balloon,
    Cloud,
    Gunfire,
    Bomb,
    SmartMissile,
    Shrapnel,
    Decoy,
}

impl UnitType {
    pub const ALL: [UnitType; 19] = [
        UnitType::Helicopter,
        UnitType::Tank,
        UnitType::Van,
        UnitType::MissileLauncher,
        UnitType::Infantry,
        UnitType::Engineer,
        UnitType::ParachuteInfantry,
        UnitType::Bunker,
        UnitType::SuperBunker,
        UnitType::EndBunker,
        UnitType::Turret,
        UnitType::LandingPad,
        UnitType::Balloon,
        UnitType::Cloud,
        UnitType::Gunfire,
        UnitType::Bomb,
        UnitType::SmartMissile,
        UnitType::Shrapnel,
        UnitType::Decoy,
    ];

    /// Stable token used in configuration and query strings.
    pub fn token(self) -> &'static str {
        match self {
            UnitType::Helicopter => "helicopter",
            UnitType::Tank => "tank",
            UnitType::Van => "van",
            UnitType::MissileLauncher => "missile_launcher",
            UnitType::Infantry => "infantry",
            UnitType::Engineer => "engineer",
            UnitType::ParachuteInfantry => "parachute_infantry",
            UnitType::Bunker => "bunker",
            UnitType::SuperBunker => "super_bunker",
            UnitType::EndBunker => "end_bunker",
            UnitType::Turret => "turret",
            UnitType::LandingPad => "landing_pad",
            UnitType::Balloon => "balloon",
            UnitType::Cloud => "cloud",
            UnitType::Gunfire => "gunfire",
            UnitType::Bomb => "bomb",
            UnitType::SmartMissile => "smart_missile",
            UnitType::Shrapnel => "shrapnel",
            UnitType::Decoy => "decoy",
        }
    }

    pub fn is_aircraft(self) -> bool {
        matches!(self, UnitType::Helicopter)
    }

    /// Units that live on the ground plane and cannot leave it.
    pub fn is_ground_bound(self) -> bool {
        matches!(
            self,
            UnitType::Tank
                | UnitType::Van
                | UnitType::MissileLauncher
                | UnitType::Infantry
                | UnitType::Engineer
                | UnitType::Bunker
                | UnitType::SuperBunker
                | UnitType::EndBunker
                | UnitType::Turret
                | UnitType::LandingPad
        )
    }

    pub fn is_structure(self) -> bool {
        matches!(
            self,
            UnitType::Bunker
                | UnitType::SuperBunker
                | UnitType::EndBunker
                | UnitType::Turret
                | UnitType::LandingPad
        )
    }

    /// Fixed structures that stop aimed fire from reaching what is behind them.
    pub fn is_blocking(self) -> bool {
        matches!(self, UnitType::Bunker | UnitType::SuperBunker)
    }

    /// Foot soldiers that can be grouped under one bomb-ledger key.
    pub fn is_infantry(self) -> bool {
        matches!(self, UnitType::Infantry | UnitType::Engineer)
    }

    pub fn is_projectile(self) -> bool {
        matches!(
            self,
            UnitType::Gunfire
                | UnitType::Bomb
                | UnitType::SmartMissile
                | UnitType::Shrapnel
                | UnitType::Decoy
        )
    }

    /// Projectiles that are spent on first contact.
    pub fn is_single_use(self) -> bool {
        matches!(
            self,
            UnitType::Gunfire | UnitType::Bomb | UnitType::SmartMissile | UnitType::Shrapnel
        )
    }

    /// Units that carry fuel, ammunition and ordnance.
    pub fn is_controllable(self) -> bool {
        matches!(self, UnitType::Helicopter)
    }

    /// Per-target bomb quota. `None` means unbounded.
    pub fn bomb_limit(self) -> Option<u32> {
        match self {
            UnitType::Tank | UnitType::Helicopter => Some(3),
            UnitType::Turret => None,
            _ => Some(1),
        }
    }

    /// Which seeded random stream decisions for this type draw from.
    pub fn rng_stream(self) -> RngStream {
        match self {
            UnitType::Helicopter => RngStream::Helicopter,
            UnitType::Tank | UnitType::Van | UnitType::MissileLauncher => RngStream::Vehicle,
            UnitType::Infantry | UnitType::Engineer | UnitType::ParachuteInfantry => {
                RngStream::Infantry
            }
            UnitType::Turret => RngStream::Turret,
            _ => RngStream::Misc,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for UnitType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        UnitType::ALL
            .iter()
            .copied()
            .find(|t| t.token() == token)
            .ok_or_else(|| SimError::UnknownUnitType(token.to_string()))
    }
}

/// Which side of the battle a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human player's side.
    Friendly,
    /// The opposing (computer) side.
    Enemy,
}

impl Side {
    pub fn from_enemy_flag(is_enemy: bool) -> Self {
        if is_enemy {
            Side::Enemy
        } else {
            Side::Friendly
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Friendly => Side::Enemy,
            Side::Enemy => Side::Friendly,
        }
    }
}

/// Faction group selector used by collision specs and zone queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionGroup {
    Friendly,
    #[default]
    Enemy,
    All,
}

/// Game difficulty. `Extreme` is the hardest setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Hard,
    Extreme,
}

/// Named deterministic random streams, one per unit-type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RngStream {
    Helicopter,
    Vehicle,
    Infantry,
    Turret,
    Misc,
}

impl RngStream {
    pub const ALL: [RngStream; 5] = [
        RngStream::Helicopter,
        RngStream::Vehicle,
        RngStream::Infantry,
        RngStream::Turret,
        RngStream::Misc,
    ];

    pub fn index(self) -> u64 {
        match self {
            RngStream::Helicopter => 0,
            RngStream::Vehicle => 1,
            RngStream::Infantry => 2,
            RngStream::Turret => 3,
            RngStream::Misc => 4,
        }
    }
}

/// Named per-unit cooldowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cooldown {
    MissileLaunch,
    ParatrooperDrop,
    DecoyDrop,
    HitResponse,
    Retaliation,
}

/// Throttled one-at-a-time deployment actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAction {
    Paratroopers,
    Decoys,
}

impl SpecialAction {
    pub fn cooldown(self) -> Cooldown {
        match self {
            SpecialAction::Paratroopers => Cooldown::ParatrooperDrop,
            SpecialAction::Decoys => Cooldown::DecoyDrop,
        }
    }

    /// Unit type spawned by this action.
    pub fn spawns(self) -> UnitType {
        match self {
            SpecialAction::Paratroopers => UnitType::ParachuteInfantry,
            SpecialAction::Decoys => UnitType::Decoy,
        }
    }
}
