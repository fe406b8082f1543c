//! Shared simulation state passed to every system.

use tracing::debug;

use sortie_ai::profiles::{get_profile, AiProfile};
use sortie_core::components::Status;
use sortie_core::config::SimConfig;
use sortie_core::events::SimEvent;
use sortie_core::types::{SimTime, UnitId};
use sortie_core::Result;

use crate::ledger::{BombLedger, LedgerKey};
use crate::registry::{Registry, UnitLookup};
use crate::rng::RngStreams;
use crate::timers::Scheduler;
use crate::world_setup::Blueprint;
use crate::zones::ZoneIndex;

pub struct Battlefield {
    pub registry: Registry,
    pub zones: ZoneIndex,
    pub scheduler: Scheduler,
    pub ledger: BombLedger,
    pub rng: RngStreams,
    pub config: SimConfig,
    pub profile: AiProfile,
    pub time: SimTime,
    /// Events emitted this tick, drained into the snapshot.
    pub events: Vec<SimEvent>,
}

impl Battlefield {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: Registry::new(),
            zones: ZoneIndex::new(config.world_width, config.zone_width),
            scheduler: Scheduler::new(),
            ledger: BombLedger::new(),
            rng: RngStreams::new(config.seed),
            profile: get_profile(config.difficulty),
            time: SimTime::default(),
            events: Vec::new(),
            config,
        })
    }

    pub fn tick(&self) -> u64 {
        self.time.tick
    }

    /// Create a unit and register it with the zone index.
    pub fn spawn(&mut self, blueprint: Blueprint) -> UnitId {
        let unit_type = blueprint.unit_type;
        let side = blueprint.allegiance.side();
        let (x, width) = (blueprint.kinematics.x, blueprint.kinematics.width);
        let id = self.registry.spawn(blueprint);
        self.zones.register(id, unit_type, side, x, width);
        self.events.push(SimEvent::Spawned { unit: id, unit_type });
        id
    }

    /// Mark a unit dead. It stays in the world until cleanup runs.
    pub fn kill(&mut self, id: UnitId) -> bool {
        match self.registry.get_mut::<Status>(id) {
            Some(mut status) if status.alive => {
                status.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Remove a unit and everything that references it: zone membership,
    /// pending timers and cooldowns, bomb-ledger entries and its random
    /// streams.
    pub fn destroy(&mut self, id: UnitId) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        self.zones.unregister(id);
        let cancelled = self.scheduler.cancel_owner(id);
        self.ledger.purge_unit(id, &mut self.scheduler);
        self.rng.forget(id);
        self.registry.despawn(id);
        debug!(unit = %id, cancelled, "unit removed");
        true
    }

    // --- Bomb ledger ---

    fn ledger_key(&self, target: UnitId) -> Option<(LedgerKey, Option<u32>)> {
        let view = self.registry.unit(target)?;
        let key = LedgerKey::for_target(&view, self.config.ai.area_ordnance);
        Some((key, key.limit(&view)))
    }

    /// Whether another bomb may be committed against `target`.
    pub fn can_bomb_target(&self, target: UnitId) -> bool {
        self.ledger_key(target).is_some_and(|(key, limit)| self.ledger.can_add(key, limit))
    }

    pub fn add_bomb(&mut self, target: UnitId) -> bool {
        match self.ledger_key(target) {
            Some((key, limit)) => self.ledger.add(key, limit, &mut self.scheduler),
            None => false,
        }
    }

    pub fn remove_bomb(&mut self, target: UnitId) -> bool {
        match self.ledger_key(target) {
            Some((key, _)) => self.ledger.remove(key, &mut self.scheduler),
            None => false,
        }
    }

    pub fn clear_bomb_with_delay(&mut self, target: UnitId, delay: u64) -> bool {
        let Some((key, _)) = self.ledger_key(target) else {
            return false;
        };
        let owner = matches!(key, LedgerKey::Unit { .. }).then_some(target);
        let now = self.time.tick;
        self.ledger
            .clear_after_delay(key, delay, now, owner, &mut self.scheduler)
            .is_some()
    }
}
