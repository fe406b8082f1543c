//! Kinematic integration and zone maintenance.
//!
//! Position += velocity once per tick, then bounds handling per unit kind.
//! Each unit that moved updates its zone membership exactly once. Aircraft
//! are then cloaked or uncloaked by cloud cover at their new position.

use tracing::debug;

use sortie_core::components::{Lifetime, Resources, Status};
use sortie_core::constants::*;
use sortie_core::enums::UnitType;
use sortie_core::types::{Kinematics, Rect, UnitId};

use crate::battlefield::Battlefield;
use crate::collision::overlaps;
use crate::registry::UnitLookup;
use crate::world_setup::Blueprint;

/// What the bounds check decided for one unit.
enum Landing {
    Stay,
    Die,
    Touchdown,
}

pub fn run(field: &mut Battlefield) {
    let width = field.config.world_width;
    let ceiling = field.config.world_ceiling;
    let mut touchdowns: Vec<UnitId> = Vec::new();

    for id in field.registry.ids() {
        let Some(view) = field.registry.unit(id) else {
            continue;
        };
        if !view.status.alive {
            continue;
        }
        let unit_type = view.unit_type;
        let mut kin = view.kinematics;

        if age(field, id, unit_type, &mut kin) {
            field.kill(id);
            continue;
        }

        if unit_type == UnitType::Helicopter {
            burn_fuel(field, id, &mut kin);
        }

        if kin.vx == 0.0 && kin.vy == 0.0 {
            continue;
        }
        kin.x += kin.vx;
        kin.y += kin.vy;

        let landing = if unit_type.is_projectile() {
            if unit_type == UnitType::Decoy {
                if kin.y <= 0.0 {
                    kin.y = 0.0;
                    kin.vy = 0.0;
                }
                Landing::Stay
            } else if kin.y <= 0.0 || kin.x + kin.width < 0.0 || kin.x > width || kin.y > ceiling * 2.0 {
                Landing::Die
            } else {
                Landing::Stay
            }
        } else {
            if kin.x < 0.0 || kin.x + kin.width > width {
                kin.x = kin.x.clamp(0.0, width - kin.width);
                kin.vx = 0.0;
            }
            if unit_type.is_ground_bound() {
                kin.y = 0.0;
                kin.vy = 0.0;
            } else if kin.y > ceiling - kin.height {
                kin.y = ceiling - kin.height;
                kin.vy = kin.vy.min(0.0);
            }
            if kin.y <= 0.0 {
                kin.y = 0.0;
                kin.vy = kin.vy.max(0.0);
                if unit_type == UnitType::ParachuteInfantry {
                    Landing::Touchdown
                } else {
                    Landing::Stay
                }
            } else {
                Landing::Stay
            }
        };

        field.registry.set(id, kin);
        field.zones.update(id, kin.x, kin.width);

        match landing {
            Landing::Stay => {}
            Landing::Die => {
                field.kill(id);
            }
            Landing::Touchdown => touchdowns.push(id),
        }
    }

    // Paratroopers become foot soldiers where they land.
    for id in touchdowns {
        let Some(view) = field.registry.unit(id) else {
            continue;
        };
        field.destroy(id);
        let trooper = Blueprint::new(UnitType::Infantry, view.allegiance.is_enemy, view.kinematics.x, 0.0);
        field.spawn(trooper);
    }

    conceal(field);
}

/// An aircraft is cloaked exactly while its box overlaps a live cloud.
fn conceal(field: &mut Battlefield) {
    let clouds: Vec<Rect> = field
        .registry
        .ids_of_type(UnitType::Cloud)
        .into_iter()
        .filter_map(|id| field.registry.unit(id))
        .filter(|c| c.status.alive)
        .map(|c| c.kinematics.rect())
        .collect();

    for id in field.registry.ids() {
        let Some(view) = field.registry.unit(id) else {
            continue;
        };
        if !view.unit_type.is_aircraft() || !view.status.alive {
            continue;
        }
        let rect = view.kinematics.rect();
        let covered = clouds.iter().any(|cloud| overlaps(&rect, cloud, 0.0));
        if covered == view.status.cloaked {
            continue;
        }
        if let Some(mut status) = field.registry.get_mut::<Status>(id) {
            status.cloaked = covered;
        }
        debug!(unit = %id, cloaked = covered, "cloud cover changed");
    }
}

/// Tick a transient unit's lifetime. Returns true if it should die now.
/// Spent gunfire lingers as harmless debris until it reaches the ground.
fn age(field: &mut Battlefield, id: UnitId, unit_type: UnitType, kin: &mut Kinematics) -> bool {
    let Some(mut life) = field.registry.get_mut::<Lifetime>(id) else {
        return false;
    };
    if life.ticks_left == 0 {
        return false;
    }
    life.ticks_left -= 1;
    if life.ticks_left > 0 {
        return false;
    }
    drop(life);

    match unit_type {
        UnitType::Gunfire | UnitType::Shrapnel => {
            if let Some(mut status) = field.registry.get_mut::<Status>(id) {
                status.expired = true;
            }
            kin.vx *= 0.5;
            kin.vy = -BOMB_FALL_SPEED;
            false
        }
        _ => true,
    }
}

/// Airborne helicopters burn fuel. Out of fuel, they fall.
fn burn_fuel(field: &mut Battlefield, id: UnitId, kin: &mut Kinematics) {
    let Some(mut res) = field.registry.get_mut::<Resources>(id) else {
        return;
    };
    if kin.y > LANDING_ALTITUDE {
        res.fuel = (res.fuel - FUEL_BURN_PER_TICK).max(0.0);
    }
    if res.fuel <= 0.0 {
        kin.vx = 0.0;
        kin.vy = -BOMB_FALL_SPEED;
    }
}
