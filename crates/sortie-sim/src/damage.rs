//! Hit effects.
//!
//! The collision engine only reports contact. A [`HitHandler`] decides what
//! contact means and tells the engine which autonomous units were struck so
//! the decision core can react.

use tracing::trace;

use sortie_core::components::{Allegiance, Energy, Owner};
use sortie_core::enums::UnitType;
use sortie_core::events::SimEvent;
use sortie_core::types::UnitId;

use crate::battlefield::Battlefield;
use crate::registry::UnitLookup;

/// A unit took damage from an identifiable attacker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Struck {
    pub target: UnitId,
    /// The unit responsible: a projectile's launcher, otherwise the source.
    pub attacker: UnitId,
    pub attacker_type: UnitType,
    pub killed: bool,
}

pub trait HitHandler {
    /// Apply one reported contact. Returns `None` if nothing was damaged.
    fn on_hit(&mut self, field: &mut Battlefield, source: UnitId, target: UnitId) -> Option<Struck>;
}

/// Energy removed from the target per contact.
pub fn contact_damage(source: UnitType) -> f64 {
    match source {
        UnitType::Gunfire | UnitType::Shrapnel => 1.0,
        UnitType::Bomb => 5.0,
        UnitType::SmartMissile | UnitType::Helicopter => 20.0,
        UnitType::Tank => 0.05,
        UnitType::Infantry | UnitType::Engineer => 0.02,
        _ => 0.0,
    }
}

/// Energy an engineer restores to a friendly turret per contact.
const TURRET_REPAIR: f64 = 0.05;

/// Default damage rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DamageModel;

impl DamageModel {
    /// Infantry reaching a bunker enters it, reinforcing a friendly one or
    /// capturing an opposing one. Engineers repair friendly turrets.
    fn foot_soldier_contact(field: &mut Battlefield, source: UnitId, target: UnitId) -> bool {
        let (Some(src), Some(tgt)) = (field.registry.unit(source), field.registry.unit(target)) else {
            return false;
        };
        let same_side = src.allegiance.side() == tgt.allegiance.side();
        match tgt.unit_type {
            UnitType::Bunker | UnitType::SuperBunker => {
                field.kill(source);
                if same_side {
                    if let Some(mut energy) = field.registry.get_mut::<Energy>(target) {
                        energy.current = (energy.current + 1.0).min(energy.max);
                    }
                } else {
                    let side = src.allegiance.side();
                    field.registry.set(target, Allegiance { is_enemy: src.allegiance.is_enemy, ..tgt.allegiance });
                    field.zones.set_side(target, side);
                    field.events.push(SimEvent::Captured { unit: target, side });
                }
                true
            }
            UnitType::Turret if same_side => {
                if src.unit_type == UnitType::Engineer {
                    if let Some(mut energy) = field.registry.get_mut::<Energy>(target) {
                        energy.current = (energy.current + TURRET_REPAIR).min(energy.max);
                    }
                }
                true
            }
            _ => false,
        }
    }
}

impl HitHandler for DamageModel {
    fn on_hit(&mut self, field: &mut Battlefield, source: UnitId, target: UnitId) -> Option<Struck> {
        let src = field.registry.unit(source)?;
        let tgt = field.registry.unit(target)?;
        // Earlier hits this pass may already have finished either side.
        if !src.status.alive || !tgt.status.alive {
            return None;
        }
        if src.unit_type.is_infantry() && Self::foot_soldier_contact(field, source, target) {
            return None;
        }

        if src.unit_type.is_single_use() || src.unit_type == UnitType::Helicopter {
            field.kill(source);
        }

        let damage = contact_damage(src.unit_type);
        let killed = match field.registry.get_mut::<Energy>(target) {
            Some(mut energy) => {
                energy.current -= damage;
                energy.current <= 0.0
            }
            None => false,
        };
        if killed {
            field.kill(target);
        }
        if tgt.unit_type == UnitType::Decoy {
            field.kill(target);
        }

        let owner = field.registry.component::<Owner>(source);
        let (attacker, attacker_type) = owner.map_or((source, src.unit_type), |o| (o.parent, o.parent_type));
        trace!(%source, %target, damage, killed, "hit");
        field.events.push(SimEvent::Hit { source, target });

        Some(Struck { target, attacker, attacker_type, killed })
    }
}
