//! Snapshot system: read-only view of the battlefield after a tick.

use sortie_core::components::{AiState, Energy};
use sortie_core::events::SimEvent;
use sortie_core::state::{AiSnapshot, Snapshot, UnitSnapshot};

use crate::battlefield::Battlefield;
use crate::registry::UnitLookup;

pub fn build_snapshot(field: &Battlefield, events: Vec<SimEvent>) -> Snapshot {
    let units = field
        .registry
        .ids()
        .into_iter()
        .filter_map(|id| {
            let view = field.registry.unit(id)?;
            let energy = field.registry.component::<Energy>(id).map_or(0.0, |e| e.current);
            Some(UnitSnapshot {
                id,
                unit_type: view.unit_type,
                allegiance: view.allegiance,
                status: view.status,
                kinematics: view.kinematics,
                energy,
            })
        })
        .collect();

    let ai = field
        .registry
        .ids_with::<AiState>()
        .into_iter()
        .filter_map(|id| {
            let state = field.registry.get::<AiState>(id)?;
            Some(AiSnapshot {
                id,
                modes: state.modes,
                target: state.target,
                intent: state.intent,
                refit: state.refit,
            })
        })
        .collect();

    Snapshot {
        time: field.time,
        units,
        ai,
        events,
    }
}
