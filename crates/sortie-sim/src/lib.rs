//! Simulation engine for SORTIE.
//!
//! Owns the hecs ECS world, partitions it into zones for broad-phase
//! collision, runs the decision core for autonomous units, and produces a
//! [`Snapshot`](sortie_core::state::Snapshot) every tick.

pub mod battlefield;
pub mod collision;
pub mod damage;
pub mod engine;
pub mod ledger;
pub mod registry;
pub mod rng;
pub mod steering;
pub mod systems;
pub mod targeting;
pub mod timers;
pub mod world_setup;
pub mod zones;

pub use engine::SimulationEngine;
pub use sortie_core as core;
