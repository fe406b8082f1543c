//! Fire due timers.
//!
//! A timer whose owner died before it came due is dropped without effect.

use tracing::trace;

use sortie_core::components::{AiState, Cooldowns};
use sortie_core::events::SimEvent;

use crate::battlefield::Battlefield;
use crate::systems::ai;
use crate::timers::{retire_cooldown, TimerCommand};

pub fn run(field: &mut Battlefield) {
    let now = field.tick();
    for timer in field.scheduler.drain_due(now) {
        if let Some(owner) = timer.owner {
            if !field.registry.is_alive(owner) {
                trace!(owner = %owner, command = ?timer.command, "timer owner gone");
                continue;
            }
            if let Some(mut cooldowns) = field.registry.get_mut::<Cooldowns>(owner) {
                retire_cooldown(&mut cooldowns, timer.handle);
            }
        }

        match (timer.command, timer.owner) {
            (TimerCommand::CooldownExpired { .. }, _) => {}
            (TimerCommand::EndRetaliation, Some(unit)) => {
                if let Some(mut state) = field.registry.get_mut::<AiState>(unit) {
                    state.modes.retaliation = false;
                }
                field.events.push(SimEvent::Retaliation { unit, active: false });
            }
            (TimerCommand::LaunchMissile { target }, Some(unit)) => ai::launch_missile(field, unit, target),
            (TimerCommand::Deploy { action, count }, Some(unit)) => ai::deploy(field, unit, action, count),
            (TimerCommand::ClearBombEntry { key }, _) => {
                field.ledger.expire(key, timer.handle);
            }
            (command, None) => trace!(?command, "unowned timer ignored"),
        }
    }
}
