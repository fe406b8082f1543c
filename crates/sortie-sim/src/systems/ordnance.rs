//! Turns weapon intents into projectiles.
//!
//! The decision core only raises intents. This system fires gunfire at a
//! fixed cadence while `firing` holds and releases bombs while `bombing`
//! holds, committing each bomb against the target's ledger quota.

use glam::DVec2;
use tracing::debug;

use sortie_core::components::{AiState, Resources};
use sortie_core::constants::*;
use sortie_core::enums::UnitType;
use sortie_core::events::SimEvent;
use sortie_core::types::UnitId;

use crate::battlefield::Battlefield;
use crate::ledger::LedgerKey;
use crate::registry::{UnitLookup, UnitView};
use crate::targeting::heading_faces_right;
use crate::world_setup::{dimensions, Blueprint};

/// Attached to a bomb: which ledger slot it holds and what it was aimed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombMark {
    pub key: LedgerKey,
    pub target: UnitId,
}

pub fn run(field: &mut Battlefield) {
    let now = field.tick();
    for id in field.registry.ids_with::<AiState>() {
        let Some(view) = field.registry.unit(id) else {
            continue;
        };
        if !view.status.alive {
            continue;
        }
        let Some((intent, bomb_target)) = field.registry.get::<AiState>(id).map(|ai| {
            let nearest = ai
                .bomb_votes
                .iter()
                .min_by(|a, b| a.dx.abs().total_cmp(&b.dx.abs()))
                .map(|v| v.target);
            (ai.intent, nearest)
        }) else {
            continue;
        };

        if intent.firing && now % GUN_INTERVAL_TICKS == 0 {
            fire_gun(field, &view, intent.vote_target);
        }
        if intent.bombing && now % BOMB_INTERVAL_TICKS == 0 {
            if let Some(target) = bomb_target {
                drop_bomb(field, &view, target);
            }
        }
    }
}

fn fire_gun(field: &mut Battlefield, shooter: &UnitView, aim: Option<UnitId>) {
    match field.registry.get_mut::<Resources>(shooter.id) {
        Some(mut res) if res.ammo > 0 => res.ammo -= 1,
        _ => return,
    }

    let origin = shooter.kinematics.center();
    let facing = if heading_faces_right(shooter.unit_type, shooter.allegiance.is_enemy, shooter.heading.flipped) {
        DVec2::X
    } else {
        DVec2::NEG_X
    };
    let dir = aim
        .and_then(|t| field.registry.unit(t))
        .map(|t| (t.kinematics.center() - origin).normalize_or_zero())
        .filter(|d| *d != DVec2::ZERO)
        .unwrap_or(facing);
    let v = dir * GUNFIRE_SPEED;

    let (w, h) = dimensions(UnitType::Gunfire);
    let round = Blueprint::new(UnitType::Gunfire, shooter.allegiance.is_enemy, origin.x - w / 2.0, origin.y - h / 2.0)
        .with_velocity(v.x, v.y)
        .with_owner(shooter.id, shooter.unit_type);
    field.spawn(round);
}

fn drop_bomb(field: &mut Battlefield, bomber: &UnitView, target: UnitId) {
    let Some(target_view) = field.registry.unit(target) else {
        return;
    };
    if field.registry.component::<Resources>(bomber.id).map_or(true, |r| r.bombs == 0) {
        return;
    }
    let key = LedgerKey::for_target(&target_view, field.config.ai.area_ordnance);
    let limit = key.limit(&target_view);
    if !field.ledger.add(key, limit, &mut field.scheduler) {
        return;
    }
    if let Some(mut res) = field.registry.get_mut::<Resources>(bomber.id) {
        res.bombs -= 1;
    }

    let (w, _) = dimensions(UnitType::Bomb);
    let kin = &bomber.kinematics;
    let bomb = Blueprint::new(UnitType::Bomb, bomber.allegiance.is_enemy, kin.center().x - w / 2.0, kin.y)
        .with_velocity(kin.vx, -BOMB_FALL_SPEED)
        .with_owner(bomber.id, bomber.unit_type);
    let id = field.spawn(bomb);
    field.registry.insert(id, BombMark { key, target });

    if limit.is_some_and(|max| field.ledger.count(key) >= max) {
        debug!(target = %target, "bomb quota reached");
        field.events.push(SimEvent::BombQuotaReached { target });
    }
}
