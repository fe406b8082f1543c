//! Simulation engine.
//!
//! `SimulationEngine` owns the battlefield, applies queued commands at tick
//! boundaries, runs every system in a fixed order and produces a
//! [`Snapshot`]. Completely headless; the same seed and command stream give
//! the same snapshots on every peer.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use sortie_core::commands::SimCommand;
use sortie_core::components::{Energy, Heading, Status};
use sortie_core::config::SimConfig;
use sortie_core::enums::UnitType;
use sortie_core::events::SimEvent;
use sortie_core::state::Snapshot;
use sortie_core::types::{Kinematics, SimTime, UnitId};
use sortie_core::Result;

use crate::battlefield::Battlefield;
use crate::damage::{DamageModel, HitHandler, Struck};
use crate::registry::{UnitLookup, UnitView};
use crate::steering::{SeekSteering, Steering};
use crate::systems;
use crate::world_setup::{self, Blueprint};

pub struct SimulationEngine {
    field: Battlefield,
    command_queue: VecDeque<SimCommand>,
    steering: Box<dyn Steering>,
    hits: Box<dyn HitHandler>,
    hit_buffer: Vec<(UnitId, UnitId)>,
    despawn_buffer: Vec<UnitId>,
}

impl SimulationEngine {
    /// Create an engine with the default steering and damage rules.
    /// Fails if the configuration is invalid.
    pub fn new(config: SimConfig) -> Result<Self> {
        info!(seed = config.seed, difficulty = ?config.difficulty, "simulation created");
        Ok(Self {
            field: Battlefield::new(config)?,
            command_queue: VecDeque::new(),
            steering: Box::new(SeekSteering::default()),
            hits: Box::new(DamageModel),
            hit_buffer: Vec::new(),
            despawn_buffer: Vec::new(),
        })
    }

    /// Replace the steering module.
    pub fn with_steering(mut self, steering: Box<dyn Steering>) -> Self {
        self.steering = steering;
        self
    }

    /// Replace the hit handler.
    pub fn with_hit_handler(mut self, hits: Box<dyn HitHandler>) -> Self {
        self.hits = hits;
        self
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one tick and return the resulting snapshot.
    ///
    /// Order: commands, timers, decisions, ordnance, movement, collision and
    /// hit effects, cleanup.
    pub fn tick(&mut self) -> Snapshot {
        systems::ai::begin_tick(&mut self.field);
        self.process_commands();

        systems::timers::run(&mut self.field);
        systems::ai::run(&mut self.field, self.steering.as_mut());
        systems::ordnance::run(&mut self.field);
        systems::movement::run(&mut self.field);

        let struck: Vec<Struck> =
            systems::collision::run(&mut self.field, self.hits.as_mut(), &mut self.hit_buffer);
        for hit in &struck {
            systems::ai::on_struck(&mut self.field, hit);
        }

        systems::cleanup::run(&mut self.field, &mut self.despawn_buffer);
        self.field.time.advance();

        let events = std::mem::take(&mut self.field.events);
        systems::snapshot::build_snapshot(&self.field, events)
    }

    pub fn time(&self) -> SimTime {
        self.field.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.field.config
    }

    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    /// Direct access for scenario setup and tests.
    pub fn field_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    /// Spawn a unit immediately, outside the command stream.
    pub fn spawn(&mut self, blueprint: Blueprint) -> UnitId {
        self.field.spawn(blueprint)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SimCommand) {
        let field = &mut self.field;
        if let Some(unit) = command_target(&command) {
            if !field.registry.contains(unit) {
                warn!(unit = %unit, ?command, "command names unknown unit");
                return;
            }
        }
        match command {
            SimCommand::StartBattle => {
                if field.registry.is_empty() {
                    world_setup::setup_battle(field);
                    info!(units = field.registry.len(), "battle started");
                } else {
                    warn!("battle already started");
                }
            }
            SimCommand::SpawnUnit { unit_type, is_enemy, x, y, ai } => {
                let mut blueprint = Blueprint::new(unit_type, is_enemy, x, y);
                blueprint.ai = ai && unit_type.is_controllable();
                let id = field.spawn(blueprint);
                debug!(unit = %id, %unit_type, "spawned by command");
            }
            SimCommand::DestroyUnit { unit } => {
                field.kill(unit);
            }
            SimCommand::MoveUnit { unit, vx, vy, flipped } => {
                if let Some(mut kin) = field.registry.get_mut::<Kinematics>(unit) {
                    kin.vx = vx;
                    kin.vy = vy;
                }
                field.registry.set(unit, Heading { flipped });
            }
            SimCommand::StrikeUnit { unit, attacker, attacker_type, damage } => {
                let killed = match field.registry.get_mut::<Energy>(unit) {
                    Some(mut energy) => {
                        energy.current -= damage;
                        energy.current <= 0.0
                    }
                    None => return,
                };
                if killed {
                    field.kill(unit);
                }
                field.events.push(SimEvent::Hit { source: attacker, target: unit });
                let struck = Struck { target: unit, attacker, attacker_type, killed };
                systems::ai::on_struck(field, &struck);
            }
            SimCommand::MarkDetected { unit } => {
                if let Some(mut status) = field.registry.get_mut::<Status>(unit) {
                    status.detected = true;
                }
            }
            SimCommand::SetNetworkMode { enabled } => {
                field.config.network_mode = enabled;
            }
        }
    }
}

fn command_target(command: &SimCommand) -> Option<UnitId> {
    match *command {
        SimCommand::DestroyUnit { unit }
        | SimCommand::MoveUnit { unit, .. }
        | SimCommand::StrikeUnit { unit, .. }
        | SimCommand::MarkDetected { unit } => Some(unit),
        _ => None,
    }
}

impl UnitLookup for SimulationEngine {
    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.field.registry.unit(id)
    }

    fn ids_of_type(&self, unit_type: UnitType) -> Vec<UnitId> {
        self.field.registry.ids_of_type(unit_type)
    }
}
