//! Collision pass: every unit with a collision spec dispatches against its
//! zones, then the collected hits are applied.
//!
//! Nothing is removed or moved while dispatch is running. Tween repositions
//! and hit effects are applied only after every source has been tested, so
//! the zone index stays stable for the whole pass.

use sortie_core::components::CollisionSpec;
use sortie_core::types::{Kinematics, UnitId};

use crate::battlefield::Battlefield;
use crate::collision::dispatch;
use crate::damage::{HitHandler, Struck};
use crate::registry::UnitLookup;

pub fn run(field: &mut Battlefield, handler: &mut dyn HitHandler, hits: &mut Vec<(UnitId, UnitId)>) -> Vec<Struck> {
    hits.clear();
    let mut moved: Vec<(UnitId, Kinematics)> = Vec::new();

    for id in field.registry.ids_with::<CollisionSpec>() {
        let Some(source) = field.registry.unit(id) else {
            continue;
        };
        let Some(spec) = field.registry.get::<CollisionSpec>(id) else {
            continue;
        };
        let outcome = dispatch(&spec, &source, &field.registry, &field.zones, |s, t| hits.push((s, t)));
        if let Some(kin) = outcome.repositioned {
            moved.push((id, kin));
        }
    }

    for (id, kin) in moved {
        field.registry.set(id, kin);
        field.zones.update(id, kin.x, kin.width);
    }

    hits.iter()
        .filter_map(|&(source, target)| handler.on_hit(field, source, target))
        .collect()
}
