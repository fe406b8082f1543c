//! Resource-need check and landing-pad refit.

use sortie_core::components::{Energy, Resources};
use sortie_core::constants::*;

/// Thresholds feeding the resource-need check.
#[derive(Debug, Clone, Copy)]
pub struct RefitThresholds {
    pub needs_fuel: f64,
    pub low_ammo_fraction: f64,
    pub low_energy_fraction: f64,
}

impl Default for RefitThresholds {
    fn default() -> Self {
        Self {
            needs_fuel: NEEDS_FUEL,
            low_ammo_fraction: LOW_AMMO_FRACTION,
            low_energy_fraction: LOW_ENERGY_FRACTION,
        }
    }
}

/// Low fuel alone forces a refit. Otherwise at least two of low ammo,
/// no bombs and low energy must hold.
pub fn needs_refit(res: &Resources, energy: &Energy, t: &RefitThresholds) -> bool {
    if res.fuel < t.needs_fuel {
        return true;
    }

    let low_ammo = res.max_ammo > 0 && (res.ammo as f64) < res.max_ammo as f64 * t.low_ammo_fraction;
    let no_bombs = res.max_bombs > 0 && res.bombs == 0;
    let low_energy = energy.current < energy.max * t.low_energy_fraction;

    [low_ammo, no_bombs, low_energy]
        .iter()
        .filter(|&&flag| flag)
        .count()
        >= 2
}

/// One tick of refuelling, repair and rearming. Returns true once every
/// resource is full.
pub fn refit_step(res: &mut Resources, energy: &mut Energy, tick: u64) -> bool {
    res.fuel = (res.fuel + REFUEL_PER_TICK).min(res.max_fuel);
    energy.current = (energy.current + REPAIR_PER_TICK).min(energy.max);

    if tick % REARM_INTERVAL_TICKS == 0 {
        res.ammo = (res.ammo + 4).min(res.max_ammo);
        res.bombs = (res.bombs + 1).min(res.max_bombs);
        res.smart_missiles = (res.smart_missiles + 1).min(res.max_smart_missiles);
        res.paratroopers = (res.paratroopers + 1).min(res.max_paratroopers);
        res.decoys = (res.decoys + 1).min(res.max_decoys);
    }

    res.fuel >= res.max_fuel
        && energy.current >= energy.max
        && res.ammo >= res.max_ammo
        && res.bombs >= res.max_bombs
        && res.smart_missiles >= res.max_smart_missiles
        && res.paratroopers >= res.max_paratroopers
        && res.decoys >= res.max_decoys
}
