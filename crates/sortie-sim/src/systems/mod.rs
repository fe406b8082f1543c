//! Per-tick systems.
//!
//! Systems are plain functions over the [`Battlefield`](crate::battlefield::Battlefield).
//! They hold no state of their own. The engine calls them in a fixed order.

pub mod ai;
pub mod cleanup;
pub mod collision;
pub mod movement;
pub mod ordnance;
pub mod snapshot;
pub mod timers;
