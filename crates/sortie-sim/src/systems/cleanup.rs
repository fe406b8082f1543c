//! Cleanup system: removes units that died this tick.
//!
//! Removal cancels everything that references the unit (zone membership,
//! timers, cooldowns, ledger entries). Bombs are resolved against the
//! ledger on their way out.

use tracing::debug;

use sortie_core::constants::LEDGER_CLEAR_TICKS;
use sortie_core::events::SimEvent;
use sortie_core::types::UnitId;

use crate::battlefield::Battlefield;
use crate::ledger::LedgerKey;
use crate::registry::UnitLookup;
use crate::systems::ordnance::BombMark;

/// Remove every dead unit. Uses a caller-owned buffer to avoid per-tick
/// allocation.
pub fn run(field: &mut Battlefield, buffer: &mut Vec<UnitId>) {
    buffer.clear();
    buffer.extend(field.registry.ids().into_iter().filter(|&id| !field.registry.is_alive(id)));

    for &id in buffer.iter() {
        if let Some(mark) = field.registry.component::<BombMark>(id) {
            resolve_bomb(field, mark);
        }
        if let Some(view) = field.registry.unit(id) {
            if !view.unit_type.is_projectile() {
                debug!(unit = %id, unit_type = %view.unit_type, "destroyed");
                field.events.push(SimEvent::Destroyed { unit: id, unit_type: view.unit_type });
            }
        }
    }

    for id in buffer.drain(..) {
        field.destroy(id);
    }
}

/// A spent bomb releases its quota slot: at once if the target is gone,
/// after a grace period if it survived.
fn resolve_bomb(field: &mut Battlefield, mark: BombMark) {
    if field.registry.is_alive(mark.target) {
        let owner = matches!(mark.key, LedgerKey::Unit { .. }).then_some(mark.target);
        let now = field.tick();
        field
            .ledger
            .clear_after_delay(mark.key, LEDGER_CLEAR_TICKS, now, owner, &mut field.scheduler);
    } else {
        field.ledger.remove(mark.key, &mut field.scheduler);
    }
}
