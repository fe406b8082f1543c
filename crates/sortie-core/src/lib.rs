//! Core types and definitions for the SORTIE battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! ids and geometry, unit types, components, commands, events, snapshots,
//! configuration, errors, and tuning constants. It has no dependency on
//! the ECS runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::{Result, SimError};

#[cfg(test)]
mod tests;
