//! Unit blueprints and the default battlefield layout.

use sortie_core::components::*;
use sortie_core::constants::*;
use sortie_core::enums::*;
use sortie_core::types::{Kinematics, UnitId};

use crate::battlefield::Battlefield;
use crate::targeting::flipped_for;

/// Everything needed to spawn one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub unit_type: UnitType,
    pub allegiance: Allegiance,
    pub status: Status,
    pub kinematics: Kinematics,
    pub heading: Heading,
    pub energy: Energy,
    pub resources: Option<Resources>,
    pub collision: Option<CollisionSpec>,
    pub lifetime: Option<Lifetime>,
    pub owner: Option<Owner>,
    pub ai: bool,
}

impl Blueprint {
    /// Default blueprint for a unit type at `(x, y)`, facing the other side.
    pub fn new(unit_type: UnitType, is_enemy: bool, x: f64, y: f64) -> Self {
        let (width, height) = dimensions(unit_type);
        let allegiance = Allegiance {
            is_enemy,
            is_neutral: unit_type == UnitType::Cloud,
            is_hostile: false,
        };
        let heading = Heading { flipped: flipped_for(unit_type, is_enemy, !is_enemy) };

        let mut kinematics = Kinematics::new(x, y, width, height);
        if unit_type.is_ground_bound() && !unit_type.is_structure() {
            let dir = if is_enemy { -1.0 } else { 1.0 };
            kinematics.vx = dir * VEHICLE_SPEED * ground_speed_factor(unit_type);
        }

        Self {
            unit_type,
            allegiance,
            status: Status::default(),
            kinematics,
            heading,
            energy: Energy::full(max_energy(unit_type)),
            resources: (unit_type == UnitType::Helicopter).then(helicopter_loadout),
            collision: collision_spec(unit_type),
            lifetime: lifetime(unit_type).map(|ticks_left| Lifetime { ticks_left }),
            owner: None,
            ai: false,
        }
    }

    pub fn with_ai(mut self) -> Self {
        self.ai = true;
        self
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.kinematics.vx = vx;
        self.kinematics.vy = vy;
        self
    }

    pub fn with_owner(mut self, parent: UnitId, parent_type: UnitType) -> Self {
        self.owner = Some(Owner { parent, parent_type });
        self
    }

    pub fn with_energy(mut self, current: f64) -> Self {
        self.energy.current = current;
        self
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = Some(resources);
        self
    }
}

/// Box size (width, height).
pub fn dimensions(unit_type: UnitType) -> (f64, f64) {
    use UnitType::*;
    match unit_type {
        Helicopter => (48.0, 18.0),
        Tank => (58.0, 18.0),
        Van => (38.0, 16.0),
        MissileLauncher => (54.0, 18.0),
        Infantry | Engineer => (10.0, 11.0),
        ParachuteInfantry => (10.0, 20.0),
        Bunker => (51.0, 25.0),
        SuperBunker => (80.0, 28.0),
        EndBunker => (39.0, 17.0),
        Turret => (20.0, 16.0),
        LandingPad => (81.0, 4.0),
        Balloon => (38.0, 16.0),
        Cloud => (128.0, 32.0),
        Gunfire => (2.0, 1.0),
        Bomb => (12.0, 12.0),
        SmartMissile => (12.0, 4.0),
        Shrapnel => (3.0, 3.0),
        Decoy => (4.0, 4.0),
    }
}

fn max_energy(unit_type: UnitType) -> f64 {
    use UnitType::*;
    match unit_type {
        Helicopter => 10.0,
        Tank => 8.0,
        Van => 2.0,
        MissileLauncher => 3.0,
        Bunker => 50.0,
        SuperBunker => 63.0,
        EndBunker => 100.0,
        Turret => 10.0,
        LandingPad => 1000.0,
        Balloon => 3.0,
        _ => 1.0,
    }
}

fn ground_speed_factor(unit_type: UnitType) -> f64 {
    match unit_type {
        UnitType::Van => 1.2,
        UnitType::Infantry | UnitType::Engineer => 0.4,
        _ => 1.0,
    }
}

fn lifetime(unit_type: UnitType) -> Option<u32> {
    match unit_type {
        UnitType::Gunfire | UnitType::Shrapnel => Some(GUNFIRE_LIFETIME_TICKS),
        UnitType::SmartMissile => Some(SMART_MISSILE_LIFETIME_TICKS),
        UnitType::Decoy => Some(DECOY_LIFETIME_TICKS),
        _ => None,
    }
}

/// Full helicopter loadout.
pub fn helicopter_loadout() -> Resources {
    Resources {
        fuel: 100.0,
        max_fuel: 100.0,
        ammo: 64,
        max_ammo: 64,
        bombs: 10,
        max_bombs: 10,
        smart_missiles: 2,
        max_smart_missiles: 2,
        paratroopers: 10,
        max_paratroopers: 10,
        decoys: 5,
        max_decoys: 5,
    }
}

fn enemies(types: &[UnitType]) -> Vec<CollisionTarget> {
    types
        .iter()
        .map(|&unit_type| CollisionTarget { unit_type, group: FactionGroup::Enemy })
        .collect()
}

/// What each unit type collides with. Types without a spec are only ever
/// collision candidates, never sources.
pub fn collision_spec(unit_type: UnitType) -> Option<CollisionSpec> {
    use UnitType::*;
    let spec = match unit_type {
        Helicopter => CollisionSpec {
            targets: enemies(&[Helicopter, Balloon, Bunker, SuperBunker]),
            ..Default::default()
        },
        Tank => CollisionSpec {
            targets: enemies(&[Tank, Van, MissileLauncher, Infantry, Engineer, Turret]),
            lookahead: Some(TANK_LOOKAHEAD),
            ..Default::default()
        },
        Infantry | Engineer => CollisionSpec {
            targets: enemies(&[Infantry, Engineer, Bunker, SuperBunker, Turret]),
            ..Default::default()
        },
        Gunfire | Shrapnel => CollisionSpec {
            targets: enemies(&[
                Helicopter,
                Tank,
                Van,
                MissileLauncher,
                Infantry,
                Engineer,
                ParachuteInfantry,
                Bunker,
                SuperBunker,
                Turret,
                Balloon,
                SmartMissile,
            ]),
            tween: true,
            ..Default::default()
        },
        Bomb => CollisionSpec {
            targets: enemies(&[Tank, Van, MissileLauncher, Infantry, Engineer, Bunker, SuperBunker, Turret, Helicopter]),
            tween: true,
            ..Default::default()
        },
        SmartMissile => CollisionSpec {
            targets: enemies(&[Decoy, Helicopter]),
            tween: true,
            ..Default::default()
        },
        _ => return None,
    };
    Some(spec)
}

/// Populate the default battlefield: a base at each end, armor and infantry
/// rolling toward the middle, and cloud cover in between.
pub fn setup_battle(field: &mut Battlefield) {
    let w = field.config.world_width;
    let mirror = |x: f64, unit_type: UnitType| w - x - dimensions(unit_type).0;

    let layout: [(UnitType, f64, f64); 10] = [
        (UnitType::LandingPad, 100.0, 0.0),
        (UnitType::Van, 300.0, 0.0),
        (UnitType::Tank, 400.0, 0.0),
        (UnitType::MissileLauncher, 520.0, 0.0),
        (UnitType::Infantry, 600.0, 0.0),
        (UnitType::Engineer, 620.0, 0.0),
        (UnitType::Bunker, 1500.0, 0.0),
        (UnitType::Turret, 2300.0, 0.0),
        (UnitType::Bunker, 3200.0, 0.0),
        (UnitType::EndBunker, 20.0, 0.0),
    ];

    for &(unit_type, x, y) in &layout {
        field.spawn(Blueprint::new(unit_type, false, x, y));
        field.spawn(Blueprint::new(unit_type, true, mirror(x, unit_type), y));
    }

    let super_bunker = UnitType::SuperBunker;
    field.spawn(Blueprint::new(super_bunker, true, w / 2.0 + 200.0, 0.0));
    field.spawn(Blueprint::new(UnitType::Balloon, true, mirror(1540.0, UnitType::Balloon), 200.0));

    for &(frac, y) in &[(0.3, 250.0), (0.6, 300.0)] {
        field.spawn(Blueprint::new(UnitType::Cloud, false, w * frac, y));
    }

    // One human helicopter and one autonomous one, each parked on its pad.
    field.spawn(Blueprint::new(UnitType::Helicopter, false, 116.0, 0.0));
    let pad_x = mirror(100.0, UnitType::LandingPad);
    field.spawn(Blueprint::new(UnitType::Helicopter, true, pad_x + 16.0, 0.0).with_ai());
}
